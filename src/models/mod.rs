pub mod document;
pub mod loaders;
pub mod outcome;
pub mod report;

pub use document::{order_documents, Document};
pub use loaders::load_documents_from_folder;
pub use outcome::{FailureKind, PollOutcome, SubmissionResult};
pub use report::{Report, ReportEntry};
