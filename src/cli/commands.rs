use clap::{Parser, Subcommand};
use std::path::PathBuf;

use raadc_submit::config::DEFAULT_CONFIG_PATH;

#[derive(Parser)]
#[command(name = "raadc-submit")]
#[command(about = "Validate and submit challenge prediction files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file (extension optional)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a prediction file and submit it for your team
    Submit {
        /// Prediction file path (CSV)
        prediction: PathBuf,

        /// Validate file only
        #[arg(short, long)]
        validate_only: bool,

        /// Execute submission steps, but don't store any data on the platform
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Check a prediction file for formatting errors
    Validate {
        /// Prediction file path (CSV)
        prediction: PathBuf,
    },

    /// Show whether you and your team may submit right now
    Eligibility,

    /// Write a default configuration file
    Init,
}
