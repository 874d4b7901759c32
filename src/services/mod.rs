pub mod attachment_guard;
pub mod classifier;
pub mod poller;
pub mod progress;
pub mod report_writer;
pub mod stabilizer;
pub mod upload_driver;

pub use attachment_guard::AttachmentGuard;
pub use classifier::ErrorClassifier;
pub use poller::{poll_until, PollPolicy, Poller};
pub use progress::{ChannelProgress, LogProgress, Progress, ProgressSink};
pub use report_writer::{report_sink, JsonReportWriter, MarkdownReportWriter, ReportSink};
pub use stabilizer::{ResponseStabilizer, StabilityTracker};
pub use upload_driver::UploadDriver;
