//! In-memory habit tracker.
//!
//! [`HabitTracker`] owns the habits and their completion records. Habits keep
//! insertion order and unique names. A record set exists exactly as long as
//! its habit does, and only ever holds dates inside the habit's current
//! period:
//!
//! - [`HabitTracker::mark_completed`] ignores out-of-period dates
//! - [`HabitTracker::update_habit_dates`] prunes marks the new period no
//!   longer covers
//!
//! so counts, rates and the persisted snapshot always agree.
//!
//! Unknown names are never an error here. Queries answer `false` / `0` /
//! `0.0` and mutations are no-ops.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::error::{TrackerError, ValidationError};
use crate::habit::Habit;

#[derive(Debug, Clone, Default)]
pub struct HabitTracker {
    habits: Vec<Habit>,
    records: HashMap<String, BTreeSet<NaiveDate>>,
}

impl HabitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a habit with an empty completion set.
    ///
    /// # Errors
    /// `DuplicateHabit` if the name is taken; the tracker is left unchanged.
    pub fn add_habit(&mut self, habit: Habit) -> Result<(), TrackerError> {
        if self.contains(habit.name()) {
            return Err(TrackerError::DuplicateHabit(habit.name().to_string()));
        }
        tracing::debug!(
            habit = habit.name(),
            start = %habit.start_date(),
            end = %habit.end_date(),
            "habit added"
        );
        self.records.insert(habit.name().to_string(), BTreeSet::new());
        self.habits.push(habit);
        Ok(())
    }

    /// Remove a habit and its completion records. Returns whether it existed.
    pub fn remove_habit(&mut self, name: &str) -> bool {
        let Some(index) = self.position(name) else {
            return false;
        };
        self.habits.remove(index);
        self.records.remove(name);
        tracing::debug!(habit = name, "habit removed");
        true
    }

    /// Record a completion. Returns whether the record set changed.
    ///
    /// No-op for unknown names, dates outside the period, and dates already
    /// marked.
    pub fn mark_completed(&mut self, name: &str, date: NaiveDate) -> bool {
        if !self.is_date_in_habit_period(name, date) {
            return false;
        }
        self.records
            .get_mut(name)
            .map(|dates| dates.insert(date))
            .unwrap_or(false)
    }

    /// Remove a completion. Returns whether the record set changed.
    pub fn remove_completed(&mut self, name: &str, date: NaiveDate) -> bool {
        self.records
            .get_mut(name)
            .map(|dates| dates.remove(&date))
            .unwrap_or(false)
    }

    /// Flip the completion mark for `date`.
    ///
    /// Returns the new state, or `None` when the habit is unknown or the date
    /// is outside its period.
    pub fn toggle_completed(&mut self, name: &str, date: NaiveDate) -> Option<bool> {
        if !self.is_date_in_habit_period(name, date) {
            return None;
        }
        if self.is_completed(name, date) {
            self.remove_completed(name, date);
            Some(false)
        } else {
            self.mark_completed(name, date);
            Some(true)
        }
    }

    pub fn is_completed(&self, name: &str, date: NaiveDate) -> bool {
        self.records
            .get(name)
            .is_some_and(|dates| dates.contains(&date))
    }

    pub fn completed_days_count(&self, name: &str) -> usize {
        self.records.get(name).map_or(0, BTreeSet::len)
    }

    /// Completed days over total period days, as a percentage.
    ///
    /// 0.0 for unknown habits.
    pub fn completion_rate(&self, name: &str) -> f64 {
        let Some(habit) = self.habit(name) else {
            return 0.0;
        };
        let completed = self.completed_days_count(name) as f64;
        completed / f64::from(habit.total_days()) * 100.0
    }

    /// Replace a habit's period, keeping its position and name.
    ///
    /// Completions outside the new period are dropped.
    ///
    /// # Errors
    /// `InvalidPeriod` when `new_end < new_start`; nothing changes.
    pub fn update_habit_dates(
        &mut self,
        name: &str,
        new_start: NaiveDate,
        new_end: NaiveDate,
    ) -> Result<bool, ValidationError> {
        let Some(index) = self.position(name) else {
            return Ok(false);
        };
        let updated = self.habits[index].with_period(new_start, new_end)?;

        let mut pruned = 0;
        if let Some(dates) = self.records.get_mut(name) {
            let before = dates.len();
            dates.retain(|d| updated.is_in_period(*d));
            pruned = before - dates.len();
        }
        tracing::debug!(
            habit = name,
            start = %new_start,
            end = %new_end,
            pruned,
            "habit period updated"
        );
        self.habits[index] = updated;
        Ok(true)
    }

    pub fn is_date_in_habit_period(&self, name: &str, date: NaiveDate) -> bool {
        self.habit(name).is_some_and(|h| h.is_in_period(date))
    }

    /// Current unbroken streak ending at `today`.
    ///
    /// Walks backward from `today` while the day is inside the period and
    /// completed. Upcoming habits, finished habits and an unchecked `today`
    /// all yield 0.
    pub fn compute_streak(&self, name: &str, today: NaiveDate) -> u32 {
        let Some(habit) = self.habit(name) else {
            return 0;
        };
        let mut streak = 0;
        let mut day = today;
        while habit.is_in_period(day) && self.is_completed(name, day) {
            streak += 1;
            match day.pred_opt() {
                Some(prev) => day = prev,
                None => break,
            }
        }
        streak
    }

    /// Remove every habit whose period ended before `today`.
    ///
    /// Returns the removed habits in their original order.
    pub fn remove_expired(&mut self, today: NaiveDate) -> Vec<Habit> {
        let (expired, kept): (Vec<Habit>, Vec<Habit>) = std::mem::take(&mut self.habits)
            .into_iter()
            .partition(|h| h.is_expired(today));
        self.habits = kept;
        for habit in &expired {
            self.records.remove(habit.name());
        }
        expired
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit(&self, name: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Completed dates of a habit in ascending order; empty for unknown names.
    pub fn completions(&self, name: &str) -> impl Iterator<Item = NaiveDate> + '_ {
        self.records.get(name).into_iter().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.habits.iter().position(|h| h.name() == name)
    }
}
