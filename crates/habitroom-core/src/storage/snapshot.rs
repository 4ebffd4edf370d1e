//! On-disk snapshot format.
//!
//! ```json
//! {
//!   "format": "habitroom",
//!   "version": 1,
//!   "saved_at": "2024-01-10T12:00:00Z",
//!   "habits": [{"name": "Run", "start_date": "2024-01-01", "end_date": "2024-01-31"}],
//!   "completions": {"Run": ["2024-01-08", "2024-01-09"]}
//! }
//! ```
//!
//! Decoding happens in two stages. The envelope (`format`, `version`, and the
//! presence and shape of `habits` / `completions`) must parse or the whole
//! store is rejected. Individual habit descriptors and completion dates are
//! then decoded one by one; a bad item is skipped and counted.
//! Unknown fields are ignored so newer minor additions stay readable.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StorageError;
use crate::habit::Habit;
use crate::tracker::HabitTracker;

pub const FORMAT_TAG: &str = "habitroom";
pub const CURRENT_VERSION: u32 = 1;

/// One habit descriptor as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitRecord {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<&Habit> for HabitRecord {
    fn from(habit: &Habit) -> Self {
        Self {
            name: habit.name().to_string(),
            start_date: habit.start_date(),
            end_date: habit.end_date(),
        }
    }
}

/// Snapshot as written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub format: &'static str,
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub habits: Vec<HabitRecord>,
    pub completions: BTreeMap<String, Vec<NaiveDate>>,
}

impl Snapshot {
    /// Capture the tracker's state.
    ///
    /// Completions are re-derived day by day over each habit's own period, so
    /// only in-period marks are written.
    pub fn capture(tracker: &HabitTracker, saved_at: DateTime<Utc>) -> Self {
        let habits = tracker.habits().iter().map(HabitRecord::from).collect();
        let completions = tracker
            .habits()
            .iter()
            .map(|habit| {
                let dates = habit
                    .days()
                    .filter(|day| tracker.is_completed(habit.name(), *day))
                    .collect();
                (habit.name().to_string(), dates)
            })
            .collect();

        Self {
            format: FORMAT_TAG,
            version: CURRENT_VERSION,
            saved_at,
            habits,
            completions,
        }
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Envelope of a stored snapshot with items still undecoded.
#[derive(Debug, Deserialize)]
pub struct RawSnapshot {
    format: String,
    version: u32,
    habits: Vec<Value>,
    completions: BTreeMap<String, Value>,
}

/// Items dropped while restoring a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItems {
    pub habits: usize,
    pub completions: usize,
}

impl SkippedItems {
    pub fn total(&self) -> usize {
        self.habits + self.completions
    }
}

impl RawSnapshot {
    /// Parse and check the envelope.
    ///
    /// # Errors
    /// Invalid JSON, a wrong shape, a foreign `format` tag, or a `version`
    /// newer than [`CURRENT_VERSION`].
    pub fn decode(content: &str) -> Result<Self, StorageError> {
        let raw: RawSnapshot = serde_json::from_str(content)?;
        if raw.format != FORMAT_TAG {
            return Err(StorageError::UnsupportedFormat(raw.format));
        }
        if raw.version == 0 || raw.version > CURRENT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: raw.version,
                supported: CURRENT_VERSION,
            });
        }
        Ok(raw)
    }

    /// Rebuild a tracker, skipping items that fail to decode.
    pub fn restore(self) -> (HabitTracker, SkippedItems) {
        let mut tracker = HabitTracker::new();
        let mut skipped = SkippedItems::default();

        for (index, value) in self.habits.into_iter().enumerate() {
            match decode_habit(value) {
                Ok(habit) => {
                    if let Err(e) = tracker.add_habit(habit) {
                        tracing::warn!(index, error = %e, "skipping habit descriptor");
                        skipped.habits += 1;
                    }
                }
                Err(message) => {
                    tracing::warn!(index, error = %message, "skipping habit descriptor");
                    skipped.habits += 1;
                }
            }
        }

        for (name, value) in self.completions {
            let Value::Array(entries) = value else {
                tracing::warn!(habit = %name, "completion entry is not a list, skipping");
                skipped.completions += 1;
                continue;
            };
            for entry in entries {
                match serde_json::from_value::<NaiveDate>(entry.clone()) {
                    Ok(date) => {
                        if !tracker.mark_completed(&name, date) && !tracker.is_completed(&name, date) {
                            tracing::debug!(habit = %name, %date, "dropping completion without matching habit period");
                        }
                    }
                    Err(e) => {
                        tracing::warn!(habit = %name, value = %entry, error = %e, "skipping completion date");
                        skipped.completions += 1;
                    }
                }
            }
        }

        (tracker, skipped)
    }
}

fn decode_habit(value: Value) -> Result<Habit, String> {
    let record: HabitRecord = serde_json::from_value(value).map_err(|e| e.to_string())?;
    Habit::new(record.name, record.start_date, record.end_date).map_err(|e| e.to_string())
}
