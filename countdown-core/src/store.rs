use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::settings::Settings;
use crate::validate::{self, ValidationError};

/// Outcome of [`SettingsStore::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// A valid record was read from disk.
    Loaded,
    /// No config file exists yet; defaults were returned.
    FirstRun,
    /// A config file exists but could not be used; defaults were returned.
    ReadError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("create config dir {} failed: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("write {} failed: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("serialize settings failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Reads, validates and persists the single settings record.
#[derive(Clone)]
pub struct SettingsStore {
    path: PathBuf,
    icon_dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("path", &self.path)
            .field("icon_dir", &self.icon_dir)
            .finish_non_exhaustive()
    }
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>, icon_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            icon_dir: icon_dir.into(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn icon_dir(&self) -> &Path {
        &self.icon_dir
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    pub fn icon_path(&self, icon: &Path) -> PathBuf {
        validate::resolve_icon(&self.icon_dir, icon)
    }

    /// Reads the persisted record.
    ///
    /// Never fails: a missing file yields [`LoadStatus::FirstRun`], anything
    /// unusable yields [`LoadStatus::ReadError`]; both come with defaults.
    pub fn load(&self) -> (Settings, LoadStatus) {
        let now = self.now();
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path=?self.path, "no config file; first run");
                return (Settings::defaults(now), LoadStatus::FirstRun);
            }
            Err(e) => {
                return self.read_error(now, format!("read {} failed: {e}", self.path.display()));
            }
        };
        let value: Value = match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(e) => {
                return self.read_error(now, format!("parse {} failed: {e}", self.path.display()));
            }
        };
        let settings = match validate::parse(&value) {
            Ok(s) => s,
            Err(e) => return self.read_error(now, e.to_string()),
        };
        if let Err(e) = self.check(&settings) {
            return self.read_error(now, e.to_string());
        }
        debug!(path=?self.path, target_time = settings.target_time, "config loaded");
        (settings, LoadStatus::Loaded)
    }

    fn read_error(&self, now: i64, reason: String) -> (Settings, LoadStatus) {
        warn!(path=?self.path, %reason, "config unusable; falling back to defaults");
        (Settings::defaults(now), LoadStatus::ReadError(reason))
    }

    /// Validates a raw field map against the current time and icon directory.
    pub fn validate(&self, candidate: &Value) -> bool {
        validate::validate(candidate, self.now(), &self.icon_dir)
    }

    pub fn check(&self, settings: &Settings) -> Result<(), ValidationError> {
        validate::check(settings, self.now(), &self.icon_dir)
    }

    /// Validates and atomically writes `settings`.
    ///
    /// Nothing on disk changes unless validation passes. The record is written
    /// to a temp file next to the target and renamed over it, so a crash never
    /// leaves a truncated config behind.
    pub fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        self.check(settings)?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let data = serde_json::to_vec(settings)?;
        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(&data).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        sync_dir(&dir);

        info!(path=?self.path, "config saved");
        Ok(())
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = std::fs::File::open(dir).and_then(|d| d.sync_all()) {
        debug!(error=%e, dir=?dir, "config dir fsync failed");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
