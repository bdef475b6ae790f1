use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::eligibility::RegistrationLinks;
use crate::error::{Result, SubmitError};

pub const DEFAULT_CONFIG_PATH: &str = "config/default";
const TOKEN_ENV_VAR: &str = "SYNAPSE_AUTH_TOKEN";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub platform: PlatformConfig,
    pub challenge: ChallengeConfig,
    pub upload: UploadConfig,
    pub validation: ValidationConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PlatformConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub request_timeout_secs: u64,
    /// Attempts made while waiting on an asynchronous table query
    pub poll_attempts: u32,
    pub poll_interval_ms: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: "https://repo-prod.prod.sagebase.org/repo/v1".to_string(),
            auth_token: None,
            request_timeout_secs: 60,
            poll_attempts: 30,
            poll_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ChallengeConfig {
    pub evaluation_id: String,
    pub team_prefix: String,
    pub team_registry_table: String,
    pub registration_links: RegistrationLinks,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            evaluation_id: "9614112".to_string(),
            team_prefix: "RAAD2 ".to_string(),
            team_registry_table: "syn17096669".to_string(),
            registration_links: RegistrationLinks::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct UploadConfig {
    pub gateway_url: String,
    pub output_dir: String,
    pub file_prefix: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            gateway_url: "https://gja3h20usl.execute-api.us-east-1.amazonaws.com/v1/predictions"
                .to_string(),
            output_dir: ".".to_string(),
            file_prefix: "raadc2_predictions".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ValidationConfig {
    pub id_column: String,
    pub required_columns: Vec<String>,
    pub score_columns: Vec<String>,
    pub score_min: Option<f64>,
    pub score_max: Option<f64>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            id_column: "PatientID".to_string(),
            required_columns: vec!["PatientID".to_string(), "RiskScore".to_string()],
            score_columns: vec!["RiskScore".to_string()],
            score_min: Some(0.0),
            score_max: Some(1.0),
        }
    }
}

impl Config {
    /// Layer the optional config file and `RAADC__*` environment variables over the defaults
    pub fn load(path: &str) -> Result<Self> {
        dotenv::dotenv().ok();

        let config = ::config::Config::builder()
            .add_source(::config::File::with_name(path).required(false))
            .add_source(::config::Environment::with_prefix("RAADC").separator("__"))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.challenge.evaluation_id.trim().is_empty() {
            return Err(SubmitError::Config("challenge.evaluation_id must be set".to_string()));
        }
        if self.platform.poll_attempts == 0 {
            return Err(SubmitError::Config("platform.poll_attempts must be at least 1".to_string()));
        }
        if let (Some(min), Some(max)) = (self.validation.score_min, self.validation.score_max) {
            if min > max {
                return Err(SubmitError::Config(format!(
                    "validation.score_min ({}) is greater than validation.score_max ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }

    /// Access token from the config file, falling back to `SYNAPSE_AUTH_TOKEN`
    pub fn access_token(&self) -> Result<String> {
        self.platform
            .auth_token
            .clone()
            .filter(|token| !token.trim().is_empty())
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok())
            .filter(|token| !token.trim().is_empty())
            .ok_or(SubmitError::MissingCredentials)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.platform.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.platform.poll_interval_ms)
    }

    /// Write the defaults as TOML; refuses to overwrite an existing file
    pub fn write_default(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let rendered = toml::to_string_pretty(&Config::default())
            .map_err(|e| SubmitError::Config(format!("Failed to render default config: {}", e)))?;
        std::fs::write(path, rendered)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let config = Config::load(missing.to_str().unwrap()).unwrap();
        assert_eq!(config.challenge.team_prefix, "RAAD2 ");
        assert_eq!(config.validation.id_column, "PatientID");
    }

    #[test]
    fn test_write_default_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("default.toml");

        assert!(Config::write_default(&path).unwrap());
        assert!(!Config::write_default(&path).unwrap());

        let base = dir.path().join("config").join("default");
        let config = Config::load(base.to_str().unwrap()).unwrap();
        assert_eq!(config.challenge.evaluation_id, "9614112");
        assert_eq!(config.upload.file_prefix, "raadc2_predictions");
    }

    #[test]
    fn test_single_registration_link_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            "[challenge.registration_links]\nstandard = \"https://example.org/terms\"\n",
        )
        .unwrap();

        let base = dir.path().join("partial");
        let config = Config::load(base.to_str().unwrap()).unwrap();
        let links = &config.challenge.registration_links;
        assert_eq!(links.standard, "https://example.org/terms");
        assert_eq!(links.advanced_compute, RegistrationLinks::default().advanced_compute);
        assert_eq!(config.challenge.evaluation_id, "9614112");
    }

    #[test]
    fn test_score_bounds_are_checked() {
        let mut config = Config::default();
        config.validation.score_min = Some(2.0);
        config.validation.score_max = Some(1.0);
        assert!(matches!(config.check(), Err(SubmitError::Config(_))));
    }

    #[test]
    fn test_config_token_wins_over_missing_env() {
        let mut config = Config::default();
        config.platform.auth_token = Some("abc".to_string());
        assert_eq!(config.access_token().unwrap(), "abc");
    }
}
