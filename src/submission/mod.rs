pub mod upload;
pub mod workflow;

pub use upload::GatewayUploader;
pub use workflow::{Session, SubmissionOutcome, SubmissionSummary, SubmissionWorkflow, SubmitOptions};
