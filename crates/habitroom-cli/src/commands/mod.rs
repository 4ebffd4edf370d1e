//! CLI command handlers.
//!
//! Store-backed commands run inside [`with_service`], which opens the store
//! once, shows startup notices, and flushes pending changes at the end.

pub mod calendar;
pub mod check;
pub mod config;
pub mod habit;
pub mod stats;

use habitroom_core::{Config, HabitService, LoadOutcome};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the store, run `f`, then save whatever changed.
///
/// Changes made before a command error are still saved.
pub fn with_service<F>(f: F) -> CmdResult
where
    F: FnOnce(&mut HabitService) -> CmdResult,
{
    let mut service = open_service()?;
    let result = f(&mut service);
    service.flush()?;
    result
}

fn open_service() -> habitroom_core::Result<HabitService> {
    let config = Config::load()?;
    let startup = HabitService::open_configured(&config, habitroom_core::today())?;

    if let LoadOutcome::Recovered { reason, backup_path } = &startup.load {
        eprintln!("warning: the habit store could not be read ({reason}); starting empty.");
        match backup_path {
            Some(path) => eprintln!("warning: the damaged file was kept at {}", path.display()),
            None => eprintln!("warning: the damaged file could not be backed up; changes will not be saved until it is moved aside"),
        }
    }
    if !startup.expired.is_empty() {
        let names: Vec<&str> = startup.expired.iter().map(|h| h.name()).collect();
        eprintln!("notice: removed expired habits: {}", names.join(", "));
    }

    Ok(startup.service)
}
