//! vibe-rollup - community statistics for coding personas
//!
//! A CLI tool that aggregates per-user persona snapshots into a
//! privacy-preserving community rollup, optionally caching the result
//! per window and date.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad input, config, cache failure, etc.)
//!   2 - Rollup suppressed and --fail-on-suppressed was set

mod analysis;
mod cli;
mod config;
mod ingest;
mod models;
mod report;
mod store;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use models::{CommunityStats, RollupRecord};
use std::io::Write;
use std::path::{Path, PathBuf};
use store::{RollupStore, CACHE_CONTROL};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config comes first so general.verbose can raise the log level
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, config.general.verbose)?;

    info!("vibe-rollup v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    match run_rollup(args, config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Rollup failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .vibe-rollup.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize thresholds, window, and persona names.");
    Ok(())
}

/// Initialize logging based on verbosity settings. Logs go to stderr so
/// that payloads written to stdout stay machine-readable.
fn init_logging(args: &Args, config_verbose: bool) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level(config_verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Compute (or load) the rollup and write it out. Returns exit code (0 or 2).
fn run_rollup(args: Args, config: Config) -> Result<i32> {
    config.rollup.validate()?;

    let store = config
        .general
        .store_dir
        .as_ref()
        .map(|dir| RollupStore::new(dir.clone()));

    let record = if args.from_store {
        let store = store
            .as_ref()
            .context("--from-store needs --store or general.store_dir in the config")?;
        let window = &config.rollup.window;
        let wanted = args
            .as_of
            .map_or_else(|| "latest".to_string(), |date| date.to_string());
        info!(
            "Loading {} {} rollup from {}",
            wanted,
            window,
            store.root().display()
        );
        let record = store
            .load_for(window, args.as_of)?
            .with_context(|| format!("No cached {} rollup for window {}", wanted, window))?;
        debug!(
            "Cached rollup from {} covers {} eligible profiles",
            record.as_of,
            record.stats.eligible_profiles()
        );
        record
    } else {
        let record = compute_record(&args, &config)?;
        if let Some(ref store) = store {
            let path = store.save(&record)?;
            info!(
                "Cached rollup at {} (serve with Cache-Control: {})",
                path.display(),
                CACHE_CONTROL
            );
        }
        record
    };

    let output = match config.general.format.unwrap_or_default() {
        OutputFormat::Json => report::generate_json_report(&record.stats)?,
        OutputFormat::Markdown => report::generate_markdown_report(&record),
    };
    write_output(config.general.output.as_deref(), &output)?;

    match &record.stats {
        CommunityStats::Published(payload) => info!(
            "Published rollup: {} profiles, {} personas shown, AI tools {}",
            payload.eligible_profiles,
            payload.personas.len(),
            if payload.ai_tools.is_some() { "shown" } else { "suppressed" }
        ),
        CommunityStats::Suppressed(suppressed) => warn!(
            "Rollup suppressed: {} eligible profiles, {} required",
            suppressed.eligible_profiles, suppressed.threshold
        ),
    }

    if args.fail_on_suppressed && record.stats.is_suppressed() {
        eprintln!("\n⛔ Rollup was suppressed. Failing (exit code 2).");
        return Ok(2);
    }

    Ok(0)
}

/// Load snapshots, filter them and run the aggregator.
fn compute_record(args: &Args, config: &Config) -> Result<RollupRecord> {
    let input = args
        .input
        .as_deref()
        .context("An --input path is required")?;

    info!("Loading snapshots from {}", input.display());
    let mut snapshots = ingest::load_snapshots(input)
        .with_context(|| format!("Failed to load snapshots from {}", input.display()))?;
    ingest::ensure_unique_users(&snapshots)?;
    info!("Loaded {} snapshots", snapshots.len());

    if args.skip_eligibility {
        debug!("Eligibility filter skipped");
    } else {
        snapshots = ingest::retain_eligible(snapshots, &config.rollup);
    }

    let now = Utc::now();
    let as_of = args.as_of.unwrap_or_else(|| now.date_naive());
    let stats =
        analysis::compute_community_rollup_as_of(&snapshots, &config.rollup, as_of, now);

    Ok(RollupRecord {
        window: config.rollup.window.clone(),
        as_of,
        stats,
    })
}

/// Write to the output file, or stdout when none is configured.
fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!("Output saved to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", content).context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

/// Where the configuration came from, reported once logging is up.
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    BuiltIn,
    Fallback(anyhow::Error),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            ConfigSource::BuiltIn => debug!("No config file found, using defaults"),
            ConfigSource::Fallback(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigSource::BuiltIn)),
        Err(e) => Ok((Config::default(), ConfigSource::Fallback(e))),
    }
}
