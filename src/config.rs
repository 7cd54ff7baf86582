//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.vibe-rollup.toml` files.

use crate::cli::OutputFormat;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".vibe-rollup.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Rollup thresholds and labels.
    #[serde(default)]
    pub rollup: RollupConfig,

    /// Display names keyed by persona id.
    #[serde(default = "default_persona_names")]
    pub personas: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            rollup: RollupConfig::default(),
            personas: default_persona_names(),
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path. Writes to stdout when unset.
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Default output format.
    #[serde(default)]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Directory used to cache computed rollups.
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
}

/// Settings passed to the rollup aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupConfig {
    /// Minimum commits for a snapshot to be eligible.
    #[serde(default = "default_eligible_min_commits")]
    pub eligible_min_commits: u64,

    /// Minimum eligible profiles before anything is published.
    #[serde(default = "default_global_threshold")]
    pub global_threshold: usize,

    /// Minimum profiles behind any published breakdown bucket.
    #[serde(default = "default_bucket_threshold")]
    pub bucket_threshold: usize,

    /// Window label stamped on the payload and used as the cache key.
    #[serde(default = "default_window")]
    pub window: String,

    /// Payload version tag.
    #[serde(default = "default_version")]
    pub version: String,

    /// Display names keyed by persona id, filled from the `[personas]` table.
    #[serde(skip, default = "default_persona_names")]
    pub persona_names: BTreeMap<String, String>,
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            eligible_min_commits: default_eligible_min_commits(),
            global_threshold: default_global_threshold(),
            bucket_threshold: default_bucket_threshold(),
            window: default_window(),
            version: default_version(),
            persona_names: default_persona_names(),
        }
    }
}

fn default_eligible_min_commits() -> u64 {
    80
}

fn default_global_threshold() -> usize {
    10
}

fn default_bucket_threshold() -> usize {
    25
}

fn default_window() -> String {
    "30d".to_string()
}

fn default_version() -> String {
    "v1".to_string()
}

fn default_persona_names() -> BTreeMap<String, String> {
    [
        ("prompt_sprinter", "Prompt Sprinter"),
        ("guardrailed_viber", "Guardrailed Viber"),
        ("spec_first_director", "Spec-First Director"),
        ("vertical_slice_shipper", "Vertical Slice Shipper"),
        ("fix_loop_hacker", "Fix-Loop Hacker"),
        ("rapid_risk_taker", "Rapid Risk-Taker"),
        ("balanced_builder", "Balanced Builder"),
    ]
    .into_iter()
    .map(|(id, name)| (id.to_string(), name.to_string()))
    .collect()
}

impl RollupConfig {
    /// Display name for a persona, falling back to its id.
    pub fn persona_display_name<'a>(&'a self, persona_id: &'a str) -> &'a str {
        self.persona_names
            .get(persona_id)
            .map(String::as_str)
            .unwrap_or(persona_id)
    }

    /// Check that thresholds and labels are usable.
    pub fn validate(&self) -> Result<()> {
        if self.global_threshold == 0 {
            bail!("rollup.global_threshold must be at least 1");
        }
        if self.bucket_threshold == 0 {
            bail!("rollup.bucket_threshold must be at least 1");
        }
        if self.window.trim().is_empty() {
            bail!("rollup.window must not be empty");
        }
        if self.version.trim().is_empty() {
            bail!("rollup.version must not be empty");
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.rollup.persona_names = config.personas.clone();
        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = Some(output.clone());
        }
        if let Some(format) = args.format {
            self.general.format = Some(format);
        }
        if args.verbose {
            self.general.verbose = true;
        }
        if let Some(ref store) = args.store {
            self.general.store_dir = Some(store.clone());
        }

        if let Some(ref window) = args.window {
            self.rollup.window = window.clone();
        }
        if let Some(min_commits) = args.min_commits {
            self.rollup.eligible_min_commits = min_commits;
        }
        if let Some(threshold) = args.global_threshold {
            self.rollup.global_threshold = threshold;
        }
        if let Some(threshold) = args.bucket_threshold {
            self.rollup.bucket_threshold = threshold;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
