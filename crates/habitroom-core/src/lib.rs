//! # Habitroom Core Library
//!
//! This library provides the core business logic for the Habitroom habit
//! tracker. It follows a CLI-first philosophy: front ends (the bundled CLI or
//! any GUI) are thin layers that call into the same core and render the
//! values it derives.
//!
//! ## Architecture
//!
//! - **Tracker**: in-memory habits and per-day completion records
//! - **Stats**: completion rate, streak, status and progress tiers
//! - **Storage**: versioned JSON store with per-item recovery and
//!   backup-on-corruption, plus TOML configuration
//! - **Service**: one owning object combining tracker, store and debounced saving
//!
//! All dates are timezone-naive [`chrono::NaiveDate`] values. Operations that
//! depend on "today" take it as a parameter; [`today`] supplies the local date.
//!
//! ## Key Components
//!
//! - [`HabitTracker`]: habits and completion records
//! - [`PersistenceManager`]: snapshot load/save
//! - [`HabitService`]: the object front ends hold
//! - [`Config`]: application configuration management

pub mod error;
pub mod habit;
pub mod service;
pub mod stats;
pub mod storage;
pub mod tracker;

pub use error::{ConfigError, CoreError, Result, StorageError, TrackerError, ValidationError};
pub use habit::{days_between_inclusive, validate_new_habit, Habit, HabitStatus};
pub use service::{HabitService, StartupReport};
pub use stats::{tracker_summary, HabitStats, ProgressTier, TierThresholds};
pub use storage::{clean_expired_habits, Config, LoadOutcome, LoadReport, PersistenceManager, SaveScheduler};
pub use tracker::HabitTracker;

/// The current local calendar date.
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
