//! File-backed persistence for the habit tracker.
//!
//! The store is a single JSON file (see [`snapshot`](super::snapshot)),
//! overwritten wholesale on every save. Loading never fails:
//!
//! | store state                  | result                               |
//! |------------------------------|--------------------------------------|
//! | missing                      | empty tracker                        |
//! | readable, envelope valid     | tracker, bad items skipped           |
//! | unreadable or envelope bad   | file renamed to a backup, empty tracker |
//!
//! There is no repair in place. If the damaged file can be neither renamed
//! nor copied aside, the manager refuses every later save for that path.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use super::{data_dir, Config};
use super::snapshot::{RawSnapshot, SkippedItems, Snapshot};
use crate::error::StorageError;
use crate::habit::Habit;
use crate::tracker::HabitTracker;

/// Default store file name inside the data directory.
pub const DEFAULT_DATA_FILE: &str = "habits.json";

/// How a load ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// No store on disk yet
    NoStore,
    /// Store read; `skipped` counts items that could not be decoded
    Loaded { skipped: SkippedItems },
    /// Store was unreadable and has been moved aside
    Recovered {
        reason: String,
        /// `None` when the rename itself failed
        backup_path: Option<PathBuf>,
    },
}

/// Result of [`PersistenceManager::load`].
#[derive(Debug)]
pub struct LoadReport {
    pub tracker: HabitTracker,
    pub outcome: LoadOutcome,
}

/// Reads and writes tracker snapshots at a fixed path.
#[derive(Debug, Clone)]
pub struct PersistenceManager {
    path: PathBuf,
    /// Set when a damaged store is still the only copy at `path`.
    damaged: bool,
}

impl PersistenceManager {
    /// Use the store file named by `config` inside the data directory
    /// (`<data_dir>/habits.json` by default).
    pub fn open(config: &Config) -> Result<Self, StorageError> {
        Ok(Self::with_path(config.data_file_in(&data_dir()?)))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            damaged: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the tracker to the store, replacing its contents.
    ///
    /// # Errors
    /// Serialization or I/O failure, or [`StorageError::DamagedStore`] when
    /// the last load could not preserve a damaged file. The tracker is not
    /// touched, so the caller can retry later.
    pub fn save(&self, tracker: &HabitTracker) -> Result<(), StorageError> {
        if self.damaged {
            tracing::error!(path = %self.path.display(), "damaged store was not backed up, not saving");
            return Err(StorageError::DamagedStore(self.path.clone()));
        }
        let content = Snapshot::capture(tracker, Utc::now()).to_json()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| {
                tracing::error!(dir = %parent.display(), error = %source, "failed to create store directory");
                self.io_error(source)
            })?;
        }
        std::fs::write(&self.path, content).map_err(|source| {
            tracing::error!(path = %self.path.display(), error = %source, "failed to save habits");
            self.io_error(source)
        })?;
        tracing::info!(path = %self.path.display(), habits = tracker.len(), "habits saved");
        Ok(())
    }

    /// Read the store.
    pub fn load(&mut self) -> LoadReport {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no habit store yet, starting empty");
                return LoadReport {
                    tracker: HabitTracker::new(),
                    outcome: LoadOutcome::NoStore,
                };
            }
            Err(e) => return self.recover(self.io_error(e)),
        };

        match RawSnapshot::decode(&content) {
            Ok(raw) => {
                let (tracker, skipped) = raw.restore();
                if skipped.total() > 0 {
                    tracing::warn!(
                        habits = skipped.habits,
                        completions = skipped.completions,
                        "some stored items could not be restored"
                    );
                }
                tracing::info!(path = %self.path.display(), habits = tracker.len(), "habits loaded");
                LoadReport {
                    tracker,
                    outcome: LoadOutcome::Loaded { skipped },
                }
            }
            Err(e) => self.recover(e),
        }
    }

    /// Move an unreadable store aside and start empty.
    ///
    /// Falls back to copying when the rename fails. When neither works the
    /// manager is marked damaged and [`save`](Self::save) refuses to run.
    fn recover(&mut self, error: StorageError) -> LoadReport {
        tracing::warn!(path = %self.path.display(), error = %error, "habit store is unreadable");
        let backup = self.backup_path();
        let backup_path = match std::fs::rename(&self.path, &backup) {
            Ok(()) => {
                tracing::warn!(backup = %backup.display(), "damaged store moved to backup");
                Some(backup)
            }
            Err(e) => {
                tracing::warn!(backup = %backup.display(), error = %e, "rename failed, copying damaged store");
                match std::fs::copy(&self.path, &backup) {
                    Ok(_) => Some(backup),
                    Err(e) => {
                        tracing::error!(backup = %backup.display(), error = %e, "failed to back up damaged store");
                        self.damaged = true;
                        None
                    }
                }
            }
        };
        LoadReport {
            tracker: HabitTracker::new(),
            outcome: LoadOutcome::Recovered {
                reason: error.to_string(),
                backup_path,
            },
        }
    }

    /// `<store>.backup.<unix millis>`
    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".backup.{}", Utc::now().timestamp_millis()));
        PathBuf::from(name)
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Remove habits whose period ended before `today`.
///
/// Returns whether anything was removed, so the caller can show a one-time
/// notice.
pub fn clean_expired_habits(tracker: &mut HabitTracker, today: NaiveDate) -> bool {
    !remove_expired_habits(tracker, today).is_empty()
}

/// Like [`clean_expired_habits`], returning the removed habits.
pub fn remove_expired_habits(tracker: &mut HabitTracker, today: NaiveDate) -> Vec<Habit> {
    let removed = tracker.remove_expired(today);
    for habit in &removed {
        tracing::info!(habit = habit.name(), end = %habit.end_date(), "removed expired habit");
    }
    if !removed.is_empty() {
        tracing::info!(count = removed.len(), "expired habit cleanup finished");
    }
    removed
}
