//! Owning service that front ends talk to.
//!
//! A [`HabitService`] holds one tracker, the persistence manager for its store
//! and a [`SaveScheduler`]. It is created once at startup and handed to every
//! collaborator by `&mut`; there is no global instance.
//!
//! ```rust,ignore
//! let startup = HabitService::open_configured(&Config::load()?, today())?;
//! let mut service = startup.service;
//! service.mark_completed("Run", today());
//! service.flush()?;
//! ```

use std::time::Instant;

use chrono::NaiveDate;

use crate::error::{TrackerError, ValidationError};
use crate::habit::Habit;
use crate::stats::{tracker_summary, HabitStats, TierThresholds};
use crate::storage::{remove_expired_habits, Config, LoadOutcome, PersistenceManager, SaveScheduler};
use crate::tracker::HabitTracker;

/// What happened while opening the service, for one-time notices.
#[derive(Debug)]
pub struct StartupReport {
    pub service: HabitService,
    pub load: LoadOutcome,
    /// Habits removed by the expired-habit cleanup
    pub expired: Vec<Habit>,
}

#[derive(Debug)]
pub struct HabitService {
    tracker: HabitTracker,
    persistence: PersistenceManager,
    scheduler: SaveScheduler,
    thresholds: TierThresholds,
}

impl HabitService {
    /// Open the store named by `config` in the data directory.
    ///
    /// # Errors
    /// The data directory cannot be created.
    pub fn open_configured(config: &Config, today: NaiveDate) -> crate::Result<StartupReport> {
        let persistence = PersistenceManager::open(config)?;
        tracing::debug!(store = %persistence.path().display(), "opening habit store");
        Ok(Self::open(persistence, config, today))
    }

    /// Load the store and run startup maintenance.
    pub fn open(mut persistence: PersistenceManager, config: &Config, today: NaiveDate) -> StartupReport {
        let report = persistence.load();
        let mut service = Self::new(report.tracker, persistence, config);

        let expired = if config.cleanup.remove_expired_on_startup {
            let expired = remove_expired_habits(&mut service.tracker, today);
            if !expired.is_empty() {
                service.touch();
            }
            expired
        } else {
            Vec::new()
        };

        StartupReport {
            service,
            load: report.outcome,
            expired,
        }
    }

    /// Wrap an existing tracker without touching the store.
    pub fn new(tracker: HabitTracker, persistence: PersistenceManager, config: &Config) -> Self {
        Self {
            tracker,
            persistence,
            scheduler: SaveScheduler::new(config.debounce()),
            thresholds: config.tier_thresholds(),
        }
    }

    pub fn tracker(&self) -> &HabitTracker {
        &self.tracker
    }

    pub fn persistence(&self) -> &PersistenceManager {
        &self.persistence
    }

    pub fn add_habit(&mut self, habit: Habit) -> Result<(), TrackerError> {
        self.tracker.add_habit(habit)?;
        self.touch();
        Ok(())
    }

    /// Build and register a habit in one step.
    ///
    /// # Errors
    /// `Validation` for an empty name or reversed period, `DuplicateHabit`
    /// for a taken name.
    pub fn create_habit(&mut self, name: &str, start: NaiveDate, end: NaiveDate) -> Result<&Habit, TrackerError> {
        self.add_habit(Habit::new(name, start, end)?)?;
        self.tracker
            .habit(name)
            .ok_or_else(|| TrackerError::NotFound(name.to_string()))
    }

    pub fn remove_habit(&mut self, name: &str) -> bool {
        self.changed(|t| t.remove_habit(name))
    }

    pub fn mark_completed(&mut self, name: &str, date: NaiveDate) -> bool {
        self.changed(|t| t.mark_completed(name, date))
    }

    pub fn remove_completed(&mut self, name: &str, date: NaiveDate) -> bool {
        self.changed(|t| t.remove_completed(name, date))
    }

    pub fn toggle_completed(&mut self, name: &str, date: NaiveDate) -> Option<bool> {
        let state = self.tracker.toggle_completed(name, date);
        if state.is_some() {
            self.touch();
        }
        state
    }

    pub fn update_habit_dates(
        &mut self,
        name: &str,
        new_start: NaiveDate,
        new_end: NaiveDate,
    ) -> Result<bool, ValidationError> {
        let updated = self.tracker.update_habit_dates(name, new_start, new_end)?;
        if updated {
            self.touch();
        }
        Ok(updated)
    }

    pub fn stats(&self, name: &str, today: NaiveDate) -> Option<HabitStats> {
        let habit = self.tracker.habit(name)?;
        Some(HabitStats::compute(&self.tracker, habit, today, self.thresholds))
    }

    pub fn summary(&self, today: NaiveDate) -> Vec<HabitStats> {
        tracker_summary(&self.tracker, today, self.thresholds)
    }

    /// Unsaved changes pending.
    pub fn is_dirty(&self) -> bool {
        self.scheduler.is_dirty()
    }

    /// Save if the debounce window for pending changes has elapsed.
    ///
    /// Returns whether a save happened.
    pub fn flush_if_due(&mut self, now: Instant) -> crate::Result<bool> {
        if !self.scheduler.should_flush(now) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Save pending changes now. No-op when clean.
    ///
    /// On failure the changes stay pending so a later flush retries.
    pub fn flush(&mut self) -> crate::Result<bool> {
        if !self.scheduler.is_dirty() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    fn save(&mut self) -> crate::Result<()> {
        self.persistence.save(&self.tracker)?;
        self.scheduler.mark_saved();
        Ok(())
    }

    fn changed(&mut self, op: impl FnOnce(&mut HabitTracker) -> bool) -> bool {
        let changed = op(&mut self.tracker);
        if changed {
            self.touch();
        }
        changed
    }

    fn touch(&mut self) {
        self.scheduler.mark_dirty(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn config_with_debounce(ms: u64) -> Config {
        let mut config = Config::default();
        config.autosave.debounce_ms = ms;
        config
    }

    #[test]
    fn only_real_changes_mark_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = PersistenceManager::with_path(dir.path().join("habits.json"));
        let mut service = HabitService::new(HabitTracker::new(), persistence, &Config::default());

        assert!(!service.remove_habit("ghost"));
        assert!(!service.mark_completed("ghost", d(2024, 1, 1)));
        assert!(!service.is_dirty());

        service
            .add_habit(Habit::new("Run", d(2024, 1, 1), d(2024, 1, 31)).unwrap())
            .unwrap();
        assert!(service.is_dirty());
    }

    #[test]
    fn flush_writes_once_and_clears_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("habits.json");
        let mut service = HabitService::new(
            HabitTracker::new(),
            PersistenceManager::with_path(&path),
            &config_with_debounce(60_000),
        );

        assert!(!service.flush().unwrap());
        assert!(!path.exists());

        service
            .add_habit(Habit::new("Run", d(2024, 1, 1), d(2024, 1, 31)).unwrap())
            .unwrap();
        service.mark_completed("Run", d(2024, 1, 2));

        assert!(!service.flush_if_due(Instant::now()).unwrap());
        assert!(!path.exists());
        assert!(service
            .flush_if_due(Instant::now() + Duration::from_secs(61))
            .unwrap());
        assert!(path.exists());
        assert!(!service.is_dirty());
    }

    #[test]
    fn failed_save_stays_dirty() {
        let dir = tempfile::tempdir().unwrap();
        // The store path is a directory, so writing it fails.
        let mut service = HabitService::new(
            HabitTracker::new(),
            PersistenceManager::with_path(dir.path()),
            &config_with_debounce(0),
        );
        service
            .add_habit(Habit::new("Run", d(2024, 1, 1), d(2024, 1, 31)).unwrap())
            .unwrap();

        assert!(matches!(service.flush(), Err(crate::CoreError::Storage(_))));
        assert!(service.is_dirty());
        assert_eq!(service.tracker().len(), 1);
    }

    #[test]
    fn open_cleans_expired_and_reports_them() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = PersistenceManager::with_path(dir.path().join("habits.json"));

        let mut tracker = HabitTracker::new();
        tracker
            .add_habit(Habit::new("Old", d(2024, 5, 1), d(2024, 5, 31)).unwrap())
            .unwrap();
        tracker
            .add_habit(Habit::new("New", d(2024, 6, 1), d(2024, 6, 30)).unwrap())
            .unwrap();
        persistence.save(&tracker).unwrap();

        let startup = HabitService::open(persistence.clone(), &Config::default(), d(2024, 6, 1));
        assert_eq!(startup.expired.len(), 1);
        assert_eq!(startup.expired[0].name(), "Old");
        assert!(matches!(startup.load, LoadOutcome::Loaded { .. }));
        assert!(startup.service.is_dirty());
        assert_eq!(startup.service.tracker().len(), 1);

        let mut keep = Config::default();
        keep.cleanup.remove_expired_on_startup = false;
        let startup = HabitService::open(persistence, &keep, d(2024, 6, 1));
        assert!(startup.expired.is_empty());
        assert_eq!(startup.service.tracker().len(), 2);
        assert!(!startup.service.is_dirty());
    }

    #[test]
    fn create_habit_reports_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = HabitService::new(
            HabitTracker::new(),
            PersistenceManager::with_path(dir.path().join("habits.json")),
            &Config::default(),
        );

        let habit = service.create_habit("Run", d(2024, 1, 1), d(2024, 1, 5)).unwrap();
        assert_eq!(habit.total_days(), 5);
        assert!(matches!(
            service.create_habit("Run", d(2024, 2, 1), d(2024, 2, 5)),
            Err(TrackerError::DuplicateHabit(_))
        ));
        assert_eq!(
            service.create_habit("Walk", d(2024, 1, 5), d(2024, 1, 1)).unwrap_err(),
            TrackerError::Validation(ValidationError::InvalidPeriod {
                start: d(2024, 1, 5),
                end: d(2024, 1, 1),
            })
        );
        assert!(matches!(
            service.create_habit("  ", d(2024, 1, 1), d(2024, 1, 5)),
            Err(TrackerError::Validation(ValidationError::EmptyName))
        ));
        assert_eq!(service.tracker().len(), 1);
    }

    #[test]
    fn stats_use_configured_thresholds() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.display.good_threshold = 10.0;
        let mut service = HabitService::new(
            HabitTracker::new(),
            PersistenceManager::with_path(dir.path().join("habits.json")),
            &config,
        );
        service
            .add_habit(Habit::new("Run", d(2024, 1, 1), d(2024, 1, 5)).unwrap())
            .unwrap();
        service.mark_completed("Run", d(2024, 1, 1));

        let stats = service.stats("Run", d(2024, 1, 1)).unwrap();
        assert_eq!(stats.completion_rate, 20.0);
        assert_eq!(stats.tier, crate::stats::ProgressTier::Good);
        assert!(service.stats("ghost", d(2024, 1, 1)).is_none());
        assert_eq!(service.summary(d(2024, 1, 1)).len(), 1);
    }
}
