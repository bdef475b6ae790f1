use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{
    config::Config,
    eligibility::{parse_owner_id, EligibilityChecker, EligibilityClient, EligibilityDecision, EligibilitySnapshot},
    error::{Result, SubmitError},
    platform::{
        types::{Contributor, FileEntity, SubmissionReceipt, SubmissionRequest, TeamInfo},
        PlatformClient, TeamDirectory,
    },
    predictions::{write_submission_file, PredictionTable, PredictionValidator, SchemaValidator},
    submission::upload::GatewayUploader,
    utils,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct SubmitOptions {
    /// Check the file for formatting errors but don't contact the platform
    pub validate_only: bool,
    /// Run every step up to writing the local file, but store nothing remotely
    pub dry_run: bool,
    /// Skip the confirmation prompt
    pub assume_yes: bool,
}

#[derive(Debug)]
pub enum SubmissionOutcome {
    Validated,
    DryRun { file: PathBuf, team: TeamInfo },
    Submitted(SubmissionSummary),
}

#[derive(Debug)]
pub struct SubmissionSummary {
    pub file: PathBuf,
    pub team: TeamInfo,
    pub entity: FileEntity,
    pub receipt: SubmissionReceipt,
}

/// Logged-in user and the team they submit for
pub struct Session {
    pub client: PlatformClient,
    pub owner_id: i64,
    pub team: TeamInfo,
}

/// Validate, check eligibility, upload and register a prediction file
pub struct SubmissionWorkflow {
    config: Config,
    validator: Box<dyn PredictionValidator>,
}

impl SubmissionWorkflow {
    pub fn new(config: Config) -> Self {
        let validator = Box::new(SchemaValidator::new(config.validation.clone()));
        Self { config, validator }
    }

    pub fn with_validator(config: Config, validator: Box<dyn PredictionValidator>) -> Self {
        Self { config, validator }
    }

    pub fn validate(&self, path: &Path) -> Result<PredictionTable> {
        println!("Running checks to validate data frame format...\n");
        let table = PredictionTable::from_path(path)?;

        match self.validator.validate(&table) {
            Ok(()) => {
                println!("{}", "All checks passed".green());
                Ok(table)
            }
            Err(e) => {
                warn!("Validation failed for {}", path.display());
                Err(e)
            }
        }
    }

    /// Log in with the configured token and resolve the user's challenge team
    pub async fn open_session(&self) -> Result<Session> {
        let token = self.config.access_token()?;
        let client = PlatformClient::new(&self.config.platform.base_url, &token, self.config.request_timeout())?;

        let profile = client.get_user_profile().await?;
        let owner_id = parse_owner_id(&profile.owner_id)?;
        info!(
            "Logged in as {} ({})",
            profile.user_name.as_deref().unwrap_or("unknown user"),
            owner_id
        );

        let directory = TeamDirectory::new(
            &client,
            &self.config.challenge,
            self.config.platform.poll_attempts,
            self.config.poll_interval(),
        );
        let team = directory.resolve(owner_id).await?;

        Ok(Session { client, owner_id, team })
    }

    /// Fetch eligibility for the session's team and print the explanation
    pub async fn check_eligibility(&self, session: &Session) -> Result<(EligibilitySnapshot, EligibilityDecision)> {
        self.check_eligibility_with(session.client.clone(), &session.team, session.owner_id)
            .await
    }

    async fn check_eligibility_with<C: EligibilityClient>(
        &self,
        client: C,
        team: &TeamInfo,
        owner_id: i64,
    ) -> Result<(EligibilitySnapshot, EligibilityDecision)> {
        let checker = EligibilityChecker::new(
            client,
            self.config.challenge.evaluation_id.clone(),
            self.config.challenge.registration_links.clone(),
        );
        let (snapshot, decision) = checker.check(team, owner_id).await?;
        utils::print_messages(&decision.messages, decision.allowed);
        Ok((snapshot, decision))
    }

    /// Eligibility gate, confirmation and local file. Nothing is stored remotely here.
    async fn prepare<C: EligibilityClient>(
        &self,
        client: C,
        table: &PredictionTable,
        team: &TeamInfo,
        owner_id: i64,
        options: SubmitOptions,
    ) -> Result<Prepared> {
        let (snapshot, decision) = self.check_eligibility_with(client, team, owner_id).await?;
        if !decision.allowed {
            return Err(SubmitError::NotEligible);
        }

        if !options.assume_yes
            && !utils::confirm_action(&format!("Submit predictions for team {}?", team.team_name))?
        {
            return Err(SubmitError::Cancelled);
        }

        println!("Writing data to local CSV file...");
        let file = write_submission_file(
            table,
            Path::new(&self.config.upload.output_dir),
            &self.config.upload.file_prefix,
            &team.team_name,
        )?;

        if options.dry_run {
            info!("DRY RUN: skipping upload of {}", file.display());
            return Ok(Prepared::DryRun(file));
        }
        Ok(Prepared::Ready { file, snapshot })
    }

    pub async fn run(&self, prediction: &Path, options: SubmitOptions) -> Result<SubmissionOutcome> {
        let table = self.validate(prediction)?;
        if options.validate_only {
            return Ok(SubmissionOutcome::Validated);
        }

        let session = self.open_session().await?;
        let prepared = self
            .prepare(session.client.clone(), &table, &session.team, session.owner_id, options)
            .await?;
        let (file, snapshot) = match prepared {
            Prepared::DryRun(file) => return Ok(SubmissionOutcome::DryRun { file, team: session.team }),
            Prepared::Ready { file, snapshot } => (file, snapshot),
        };

        let uploader = GatewayUploader::new(&self.config.upload.gateway_url, self.config.request_timeout())?;
        let entity = uploader.upload(&file, &session.team.folder_id).await?;

        println!("\n\nSubmitting prediction to challenge evaluation queue...\n");
        let request = submission_request(&self.config.challenge.evaluation_id, &entity, &session.team, &snapshot);
        let receipt = session
            .client
            .submit(&request, &entity.etag, &snapshot.eligibility_state_hash)
            .await?;
        info!(
            "Registered submission {} for team {} ({} contributors)",
            receipt.id,
            session.team.team_name,
            request.contributors.len()
        );

        Ok(SubmissionOutcome::Submitted(SubmissionSummary {
            file,
            team: session.team,
            entity,
            receipt,
        }))
    }
}

enum Prepared {
    DryRun(PathBuf),
    Ready { file: PathBuf, snapshot: EligibilitySnapshot },
}

/// Credits every member who is eligible and has not submitted for another team
fn submission_request(
    evaluation_id: &str,
    entity: &FileEntity,
    team: &TeamInfo,
    snapshot: &EligibilitySnapshot,
) -> SubmissionRequest {
    let contributors = snapshot
        .members_eligibility
        .iter()
        .filter(|member| member.is_eligible && !member.has_conflicting_submission)
        .map(|member| Contributor {
            principal_id: member.principal_id.to_string(),
        })
        .collect();

    SubmissionRequest {
        evaluation_id: evaluation_id.to_string(),
        entity_id: entity.id.clone(),
        version_number: entity.version_number,
        name: entity.name.clone(),
        team_id: team.team_id.clone(),
        submitter_alias: team.team_name.clone(),
        contributors,
    }
}

impl SubmissionOutcome {
    pub fn print_summary(&self) {
        match self {
            SubmissionOutcome::Validated => {
                println!("Validation only: nothing was submitted");
            }
            SubmissionOutcome::DryRun { file, team } => {
                println!("\n{}", "DRY RUN: nothing was stored on the platform".yellow());
                println!(" > local file: {}", file.display());
                println!(" > would upload to folder {} for team {}", team.folder_id, team.team_name);
            }
            SubmissionOutcome::Submitted(summary) => {
                println!(
                    "{}",
                    format!("Successfully submitted file: '{}'", summary.file.display()).green()
                );
                println!(
                    " > stored as {} [version: {}]",
                    summary.entity.id, summary.entity.version_number
                );
                println!(" > submission Id: {}", summary.receipt.id);
            }
        }
    }
}
