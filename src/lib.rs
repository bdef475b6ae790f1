pub mod eligibility;
pub mod platform;
pub mod predictions;
pub mod submission;
pub mod config;
pub mod error;
pub mod utils;

pub use crate::error::{Result, SubmitError};
pub use crate::config::Config;
