//! Core error types for habitroom-core.
//!
//! This module defines the error hierarchy using thiserror. Lookup misses
//! (unknown habit names) are deliberately absent from the tracker API: they
//! degrade to `false` / `0` / `0.0` instead of raising.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitroom-core.
///
/// Returned by operations that span more than one subsystem, such as opening
/// the service from configuration or flushing it to disk.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by [`HabitTracker`](crate::HabitTracker) mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// A habit with the same name already exists
    #[error("A habit named '{0}' already exists")]
    DuplicateHabit(String),

    /// No habit with this name
    #[error("Habit '{0}' not found")]
    NotFound(String),

    /// The habit itself is invalid
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Persistence errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read or write the store
    #[error("Failed to access store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store is not valid JSON or does not have the snapshot shape
    #[error("Failed to decode store: {0}")]
    Json(#[from] serde_json::Error),

    /// The `format` tag is not ours
    #[error("Unsupported store format '{0}'")]
    UnsupportedFormat(String),

    /// Written by a newer (or unknown) schema version
    #[error("Unsupported store version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The store was unreadable and could not be moved aside, so saving
    /// would overwrite the only copy
    #[error("Refusing to overwrite damaged store at {0}; move it aside first")]
    DamagedStore(PathBuf),

    /// Failed to resolve the data directory
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors for habit input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty or whitespace
    #[error("Habit name must not be empty")]
    EmptyName,

    /// End date before start date
    #[error("Invalid period: end date ({end}) must not be before start date ({start})")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    /// Start date lies in the past
    #[error("Start date ({start}) must be today ({today}) or later")]
    StartInPast { start: NaiveDate, today: NaiveDate },

    /// End date is today or earlier
    #[error("End date ({end}) must be after today ({today})")]
    EndNotInFuture { end: NaiveDate, today: NaiveDate },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
