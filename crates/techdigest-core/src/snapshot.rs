//! Dated raw snapshot (`raw/{date}.json`) and its locked merge store.
//!
//! Both collectors write into the same file for a given date. Each write is
//! a read-modify-write of one key, done under an exclusive advisory lock and
//! finished with an atomic rename, so concurrent stages cannot clobber each
//! other's keys or leave a torn file behind.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("raw snapshot not found: {path}")]
    Missing { path: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to lock {path}: {source}")]
    Lock {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error for {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One repository from the trending search, with its derived ranking fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingItem {
    /// `owner/repo`
    pub name: String,
    pub description: String,
    pub stars: u64,
    pub forks: u64,
    pub language: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    /// Age in days, floored at 0.1 and rounded to one decimal.
    pub days_old: f64,
    /// Stars per day since creation, rounded to one decimal.
    pub star_velocity: f64,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Token accounting reported by the completion API.
///
/// Provider-specific counters are kept in `extra` so nothing is lost on a
/// round trip through the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Answer to one configured topic query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicQueryResult {
    pub id: String,
    pub title: String,
    /// The query template as configured, before placeholder substitution.
    #[serde(default)]
    pub query: String,
    pub answer: String,
    #[serde(default)]
    pub citations: Vec<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub usage: Usage,
}

/// Contents of `raw/{date}.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub results: BTreeMap<String, TopicQueryResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_trending: Option<Vec<TrendingItem>>,
    /// Keys written by other tools; preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RawSnapshot {
    /// An empty snapshot for `date`.
    #[must_use]
    pub fn empty(date: &str) -> Self {
        Self {
            date: date.to_string(),
            model: None,
            results: BTreeMap::new(),
            github_trending: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Reads and merges dated snapshots under a `raw/` directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    raw_dir: PathBuf,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(raw_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
        }
    }

    /// `raw/{date}.json`
    #[must_use]
    pub fn path(&self, date: &str) -> PathBuf {
        self.raw_dir.join(format!("{date}.json"))
    }

    fn lock_path(&self, date: &str) -> PathBuf {
        self.raw_dir.join(format!(".{date}.lock"))
    }

    /// Load the snapshot for `date`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Missing`] if no file exists for the date,
    /// or `Io`/`Json` if it cannot be read or parsed.
    pub fn load(&self, date: &str) -> Result<RawSnapshot, SnapshotError> {
        let path = self.path(date);
        match read_snapshot(&path)? {
            Some(snapshot) => Ok(snapshot),
            None => Err(SnapshotError::Missing {
                path: path.display().to_string(),
            }),
        }
    }

    /// Apply `update` to the snapshot for `date` and write it back.
    ///
    /// Creates `raw/` and the file if needed. Keys that `update` does not
    /// touch are written back unchanged. Returns the merged snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the lock cannot be taken, or the file
    /// cannot be read, parsed, or replaced.
    pub fn merge<F>(&self, date: &str, update: F) -> Result<RawSnapshot, SnapshotError>
    where
        F: FnOnce(&mut RawSnapshot),
    {
        std::fs::create_dir_all(&self.raw_dir).map_err(|e| SnapshotError::Io {
            path: self.raw_dir.display().to_string(),
            source: e,
        })?;

        let _guard = self.lock(date)?;

        let path = self.path(date);
        let mut snapshot = read_snapshot(&path)?.unwrap_or_else(|| RawSnapshot::empty(date));
        update(&mut snapshot);
        self.write_atomic(&path, &snapshot)?;

        tracing::debug!(path = %path.display(), "merged raw snapshot");
        Ok(snapshot)
    }

    /// Exclusive lock on `raw/.{date}.lock`, released when the file drops.
    fn lock(&self, date: &str) -> Result<File, SnapshotError> {
        let lock_path = self.lock_path(date);
        let lock_err = |e| SnapshotError::Lock {
            path: lock_path.display().to_string(),
            source: e,
        };

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(lock_err)?;
        file.lock_exclusive().map_err(lock_err)?;
        Ok(file)
    }

    fn write_atomic(&self, path: &Path, snapshot: &RawSnapshot) -> Result<(), SnapshotError> {
        let io_err = |e| SnapshotError::Io {
            path: path.display().to_string(),
            source: e,
        };

        let tmp = temp_file_builder()
            .tempfile_in(&self.raw_dir)
            .map_err(io_err)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, snapshot).map_err(|e| {
                SnapshotError::Json {
                    path: path.display().to_string(),
                    source: e,
                }
            })?;
            std::io::Write::flush(&mut writer).map_err(io_err)?;
        }
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

/// Temp files default to 0600; ask for 0666 so the persisted snapshot gets
/// the same umask-derived mode as any other file the process creates.
#[cfg(unix)]
fn temp_file_builder() -> tempfile::Builder<'static, 'static> {
    use std::os::unix::fs::PermissionsExt;

    let mut builder = tempfile::Builder::new();
    builder.permissions(std::fs::Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn temp_file_builder() -> tempfile::Builder<'static, 'static> {
    tempfile::Builder::new()
}

fn read_snapshot(path: &Path) -> Result<Option<RawSnapshot>, SnapshotError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(SnapshotError::Io {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| SnapshotError::Json {
            path: path.display().to_string(),
            source: e,
        })
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;
