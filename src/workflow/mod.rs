pub mod document_ctx;
pub mod submission_flow;

pub use document_ctx::DocumentCtx;
pub use submission_flow::SubmissionFlow;
