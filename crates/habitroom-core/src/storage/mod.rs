mod config;
pub mod persistence;
pub mod scheduler;
pub mod snapshot;

pub use config::{AutosaveConfig, CleanupConfig, Config, DisplayConfig, StorageConfig};
pub use persistence::{
    clean_expired_habits, remove_expired_habits, LoadOutcome, LoadReport, PersistenceManager,
    DEFAULT_DATA_FILE,
};
pub use scheduler::SaveScheduler;

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/habitroom[-dev]/` based on HABITROOM_ENV.
///
/// Set HABITROOM_ENV=dev to use development data directory.
/// HABITROOM_DATA_DIR, when set, replaces the whole path.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("HABITROOM_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("HABITROOM_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("habitroom-dev")
            } else {
                base_dir.join("habitroom")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
