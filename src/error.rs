use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("No eligibility record for user {owner_id} on team {team_id}. Check that you are logged in with the account that belongs to your challenge team.")]
    MemberNotFound { owner_id: i64, team_id: String },

    #[error("Invalid owner id: {0}")]
    InvalidOwnerId(String),

    #[error("The submission window for evaluation {evaluation_id} is closed (status {status})")]
    SubmissionWindowClosed { evaluation_id: String, status: u16 },

    #[error("You are not a member of a challenge team starting with '{0}'")]
    TeamNotFound(String),

    #[error("No prediction folder registered for team '{0}'")]
    TeamFolderNotFound(String),

    #[error("Exiting submission attempt.")]
    NotEligible,

    #[error("Submission cancelled")]
    Cancelled,

    #[error("Prediction file failed validation:\n{}", .0.join("\n"))]
    Validation(Vec<String>),

    #[error("No access token configured. Set SYNAPSE_AUTH_TOKEN or platform.auth_token")]
    MissingCredentials,

    #[error("Platform request failed ({status}): {message}")]
    Platform { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<::config::ConfigError> for SubmitError {
    fn from(value: ::config::ConfigError) -> Self {
        SubmitError::Config(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SubmitError>;
