//! File-backed rollup cache.
//!
//! Records are stored as `<root>/<window>/<YYYY-MM-DD>.json`, one per
//! window and date. Writing the same key again replaces the record.

use crate::models::RollupRecord;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Cache policy for serving cached rollups publicly.
pub const CACHE_CONTROL: &str = "public, max-age=300, stale-while-revalidate=3600";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised by the rollup store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid window label: {0:?}")]
    InvalidWindow(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt rollup record {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize rollup record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Directory of cached rollup records.
#[derive(Debug, Clone)]
pub struct RollupStore {
    root: PathBuf,
}

impl RollupStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record for `window` on `as_of`.
    pub fn record_path(&self, window: &str, as_of: NaiveDate) -> Result<PathBuf, StoreError> {
        Ok(self
            .window_dir(window)?
            .join(format!("{}.json", as_of.format(DATE_FORMAT))))
    }

    /// Write a record, replacing any existing record for the same key.
    pub fn save(&self, record: &RollupRecord) -> Result<PathBuf, StoreError> {
        let dir = self.window_dir(&record.window)?;
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;

        let path = self.record_path(&record.window, record.as_of)?;
        let tmp_path = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(record)?;

        fs::write(&tmp_path, content).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::Io {
                path: path.clone(),
                source,
            });
        }

        debug!("Wrote rollup record {}", path.display());
        Ok(path)
    }

    /// Load the record for `window` on `as_of`, if present.
    pub fn load(&self, window: &str, as_of: NaiveDate) -> Result<Option<RollupRecord>, StoreError> {
        let path = self.record_path(window, as_of)?;
        if !path.exists() {
            return Ok(None);
        }
        read_record(&path).map(Some)
    }

    /// Load the record for `as_of` when given, otherwise the most recent one.
    pub fn load_for(
        &self,
        window: &str,
        as_of: Option<NaiveDate>,
    ) -> Result<Option<RollupRecord>, StoreError> {
        match as_of {
            Some(date) => self.load(window, date),
            None => self.latest(window),
        }
    }

    /// Load the most recent record for `window`, if any.
    pub fn latest(&self, window: &str) -> Result<Option<RollupRecord>, StoreError> {
        let dir = self.window_dir(window)?;
        if !dir.is_dir() {
            return Ok(None);
        }

        let entries = fs::read_dir(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;

        let newest = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    return None;
                }
                let stem = path.file_stem()?.to_str()?;
                match NaiveDate::parse_from_str(stem, DATE_FORMAT) {
                    Ok(date) => Some(date),
                    Err(_) => {
                        warn!("Ignoring unexpected file in rollup store: {}", path.display());
                        None
                    }
                }
            })
            .max();

        match newest {
            Some(date) => self.load(window, date),
            None => Ok(None),
        }
    }

    fn window_dir(&self, window: &str) -> Result<PathBuf, StoreError> {
        let valid = !window.is_empty()
            && !window.starts_with('.')
            && window
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(StoreError::InvalidWindow(window.to_string()));
        }
        Ok(self.root.join(window))
    }
}

fn read_record(path: &Path) -> Result<RollupRecord, StoreError> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}
