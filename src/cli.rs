//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use chrono::NaiveDate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// vibe-rollup - privacy-preserving community statistics for coding personas
///
/// Aggregates per-user persona snapshots into a community rollup.
/// Cohorts below the global threshold are suppressed, and breakdowns
/// supported by too few profiles are withheld.
///
/// Examples:
///   vibe-rollup --input snapshots.json
///   vibe-rollup --input snapshots/ --store ./rollups --format markdown
///   vibe-rollup --input - --bucket-threshold 5 < snapshots.jsonl
///   vibe-rollup --from-store --store ./rollups
///   vibe-rollup --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Snapshot input: JSON array, JSON-lines file, directory, or `-` for stdin
    #[arg(
        short,
        long,
        value_name = "PATH",
        required_unless_present_any = ["init_config", "from_store"],
        conflicts_with = "from_store"
    )]
    pub input: Option<PathBuf>,

    /// Output file path. Defaults to stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (json, markdown). Defaults to general.format, then json
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .vibe-rollup.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory where computed rollups are cached
    #[arg(long, value_name = "DIR", env = "VIBE_ROLLUP_STORE")]
    pub store: Option<PathBuf>,

    /// Render the latest cached rollup instead of computing one
    #[arg(long)]
    pub from_store: bool,

    /// Rollup window label (e.g. 30d)
    #[arg(long, value_name = "LABEL")]
    pub window: Option<String>,

    /// Date to stamp on the rollup (YYYY-MM-DD). Defaults to today (UTC)
    #[arg(long, value_name = "DATE")]
    pub as_of: Option<NaiveDate>,

    /// Minimum commits for a snapshot to be eligible
    #[arg(long, value_name = "COUNT")]
    pub min_commits: Option<u64>,

    /// Minimum eligible profiles before anything is published
    #[arg(long, value_name = "COUNT")]
    pub global_threshold: Option<usize>,

    /// Minimum profiles behind any published bucket
    #[arg(long, value_name = "COUNT")]
    pub bucket_threshold: Option<usize>,

    /// Treat every input snapshot as eligible
    #[arg(long)]
    pub skip_eligibility: bool,

    /// Exit with code 2 when the rollup is suppressed
    #[arg(long)]
    pub fail_on_suppressed: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .vibe-rollup.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the rollup.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON payload (default)
    #[default]
    Json,
    /// Markdown summary
    Markdown,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.global_threshold == Some(0) {
            return Err("Global threshold must be at least 1".to_string());
        }

        if self.bucket_threshold == Some(0) {
            return Err("Bucket threshold must be at least 1".to_string());
        }

        if let Some(ref window) = self.window {
            if window.trim().is_empty() {
                return Err("Window label must not be empty".to_string());
            }
        }

        if let Some(ref input) = self.input {
            if input.as_os_str() != "-" && !input.exists() {
                return Err(format!("Input does not exist: {}", input.display()));
            }
        } else if !self.from_store {
            return Err("An --input path is required".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is `general.verbose` from the config file; `--quiet`
    /// still wins over it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
