//! Snapshot loading.
//!
//! Reads community snapshots from a JSON array, a JSON-lines file, a
//! directory of such files, or stdin, and applies the eligibility filter
//! before the snapshots reach the aggregator.

use crate::analysis::is_eligible;
use crate::config::RollupConfig;
use crate::models::CommunitySnapshot;
use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// File extensions picked up when the input is a directory.
const SNAPSHOT_EXTENSIONS: [&str; 2] = ["json", "jsonl"];

/// Errors raised while loading snapshots.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Input not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path} (line {line}): {source}")]
    Parse {
        path: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate user_id in snapshot set: {0}")]
    DuplicateUser(String),
}

/// Load snapshots from `input`. `-` reads from stdin.
pub fn load_snapshots(input: &Path) -> Result<Vec<CommunitySnapshot>, IngestError> {
    if input == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|source| IngestError::Io {
                path: "<stdin>".to_string(),
                source,
            })?;
        return parse_snapshots(&content, "<stdin>");
    }

    if !input.exists() {
        return Err(IngestError::NotFound(input.to_path_buf()));
    }

    if input.is_dir() {
        let mut snapshots = Vec::new();
        for path in snapshot_files(input)? {
            let mut loaded = load_file(&path)?;
            debug!("Loaded {} snapshots from {}", loaded.len(), path.display());
            snapshots.append(&mut loaded);
        }
        return Ok(snapshots);
    }

    load_file(input)
}

fn load_file(path: &Path) -> Result<Vec<CommunitySnapshot>, IngestError> {
    let content = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_snapshots(&content, &path.display().to_string())
}

/// Snapshot files directly inside `dir`, sorted by name. Hidden files are skipped.
fn snapshot_files(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let entries = fs::read_dir(dir).map_err(|source| IngestError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            let hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with('.'))
                .unwrap_or(true);
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            !hidden && SNAPSHOT_EXTENSIONS.contains(&ext)
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Parse snapshots from text. A leading `[` means a JSON array, anything
/// else is treated as JSON lines.
pub fn parse_snapshots(content: &str, source: &str) -> Result<Vec<CommunitySnapshot>, IngestError> {
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(content).map_err(|e| IngestError::Parse {
            path: source.to_string(),
            line: e.line(),
            source: e,
        });
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| IngestError::Parse {
                path: source.to_string(),
                line: index + 1,
                source: e,
            })
        })
        .collect()
}

/// Fail if any `user_id` appears more than once.
pub fn ensure_unique_users(snapshots: &[CommunitySnapshot]) -> Result<(), IngestError> {
    let mut seen = HashSet::with_capacity(snapshots.len());
    for snapshot in snapshots {
        if !seen.insert(snapshot.user_id.as_str()) {
            return Err(IngestError::DuplicateUser(snapshot.user_id.clone()));
        }
    }
    Ok(())
}

/// Keep only snapshots that meet the minimum-activity threshold.
pub fn retain_eligible(
    mut snapshots: Vec<CommunitySnapshot>,
    config: &RollupConfig,
) -> Vec<CommunitySnapshot> {
    let before = snapshots.len();
    snapshots.retain(|s| is_eligible(s, config));

    let dropped = before - snapshots.len();
    if dropped > 0 {
        info!(
            "Filtered out {} snapshots below {} commits",
            dropped, config.eligible_min_commits
        );
    }

    snapshots
}
