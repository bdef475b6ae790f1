pub mod client;
pub mod teams;
pub mod types;

pub use client::PlatformClient;
pub use teams::TeamDirectory;
pub use types::{FileEntity, SubmissionReceipt, SubmissionRequest, Team, TeamInfo, UserProfile};
