mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use colored::*;
use raadc_submit::{
    config::Config,
    error::{self, SubmitError},
    submission::{SubmissionWorkflow, SubmitOptions},
    utils,
};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("raadc_submit=info,warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        if let Err(e) = initialize(&cli.config) {
            error!("{}", format!("Error: {}", e).red());
            std::process::exit(1);
        }
        return;
    }

    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Submit { prediction, validate_only, dry_run, yes } => {
            info!("Submitting {}", prediction.display());
            let options = SubmitOptions {
                validate_only,
                dry_run,
                assume_yes: yes,
            };
            submit(config, &prediction, options).await
        }

        Commands::Validate { prediction } => validate(config, &prediction),

        Commands::Eligibility => show_eligibility(config).await,

        Commands::Init => Ok(()),
    };

    if let Err(e) = result {
        match e {
            SubmitError::NotEligible | SubmitError::Cancelled => {
                println!("{}", "Exiting submission attempt.".red());
            }
            SubmitError::Validation(problems) => {
                for problem in problems {
                    println!("{}", problem.red());
                }
            }
            other => error!("{}", format!("Error: {}", other).red()),
        }
        std::process::exit(1);
    }
}

async fn submit(config: Config, prediction: &Path, options: SubmitOptions) -> error::Result<()> {
    let workflow = SubmissionWorkflow::new(config);
    let outcome = workflow.run(prediction, options).await?;
    outcome.print_summary();
    Ok(())
}

fn validate(config: Config, prediction: &Path) -> error::Result<()> {
    let workflow = SubmissionWorkflow::new(config);
    workflow.validate(prediction)?;
    Ok(())
}

async fn show_eligibility(config: Config) -> error::Result<()> {
    let workflow = SubmissionWorkflow::new(config);
    let session = workflow.open_session().await?;

    let track = if session.team.advanced_compute { "advanced compute" } else { "standard" };
    utils::print_summary(
        "=== Challenge Team ===",
        &[
            ("Team", session.team.team_name.as_str()),
            ("Team ID", session.team.team_id.as_str()),
            ("Prediction folder", session.team.folder_id.as_str()),
            ("Track", track),
        ],
    );

    let (_, decision) = workflow.check_eligibility(&session).await?;
    if !decision.allowed {
        return Err(SubmitError::NotEligible);
    }
    println!(
        "{}",
        format!("Checked at {}", utils::format_timestamp(&chrono::Local::now())).dimmed()
    );
    Ok(())
}

fn initialize(config_path: &str) -> error::Result<()> {
    let mut path = PathBuf::from(config_path);
    if path.extension().is_none() {
        path.set_extension("toml");
    }

    if Config::write_default(&path)? {
        println!("{}", format!("✓ Wrote default configuration to {}", path.display()).green());
    } else {
        println!("{}", format!("Configuration already exists at {}", path.display()).yellow());
    }

    println!("\n{}", "Next steps:".cyan());
    println!("  Set {} to your personal access token", "SYNAPSE_AUTH_TOKEN".yellow());
    println!("  {} to check your team", "raadc-submit eligibility".yellow());
    println!("  {} to submit", "raadc-submit submit predictions.csv".yellow());
    Ok(())
}
