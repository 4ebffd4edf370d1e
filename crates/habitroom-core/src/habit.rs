//! Habit value type and calendar helpers.
//!
//! A [`Habit`] is a named, inclusive calendar period. It is immutable once
//! constructed; changing its dates produces a new value via
//! [`Habit::with_period`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of calendar days from `start` to `end`, both inclusive.
///
/// Returns 1 when `start == end`. Callers must pass `start <= end`; a reversed
/// range is clamped to 1.
pub fn days_between_inclusive(start: NaiveDate, end: NaiveDate) -> u32 {
    let days = (end - start).num_days() + 1;
    days.max(1) as u32
}

/// Where a habit's period sits relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitStatus {
    /// Period has not started yet
    Upcoming,
    /// Today falls inside the period
    InProgress,
    /// Period ended before today
    Finished,
}

impl HabitStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HabitStatus::Upcoming => "upcoming",
            HabitStatus::InProgress => "in progress",
            HabitStatus::Finished => "finished",
        }
    }
}

/// A named habit bound to an inclusive date range.
///
/// Only serialized, never deserialized directly: stored habits go through
/// [`Habit::new`] so the period invariant holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Habit {
    name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl Habit {
    /// Create a habit.
    ///
    /// The name is kept exactly as given and is the habit's lookup key; front
    /// ends trim user input first. Fails when the name is empty or blank, or
    /// when `end < start`.
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if end_date < start_date {
            return Err(ValidationError::InvalidPeriod {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            name,
            start_date,
            end_date,
        })
    }

    /// Same habit, new period.
    pub fn with_period(&self, start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, ValidationError> {
        Self::new(self.name.clone(), start_date, end_date)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// `start_date <= date <= end_date`
    pub fn is_in_period(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Length of the period in days (inclusive).
    pub fn total_days(&self) -> u32 {
        days_between_inclusive(self.start_date, self.end_date)
    }

    /// A habit is expired once its end date is strictly before `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.end_date < today
    }

    pub fn status(&self, today: NaiveDate) -> HabitStatus {
        if today < self.start_date {
            HabitStatus::Upcoming
        } else if today > self.end_date {
            HabitStatus::Finished
        } else {
            HabitStatus::InProgress
        }
    }

    /// Iterate every day of the period in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |d| *d <= self.end_date)
    }
}

/// Input checks a front end applies before registering a new habit.
///
/// The engine itself only rejects empty names and reversed periods; this
/// additionally requires that the period starts today or later and ends after
/// today.
pub fn validate_new_habit(
    name: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if start_date < today {
        return Err(ValidationError::StartInPast {
            start: start_date,
            today,
        });
    }
    if end_date < start_date {
        return Err(ValidationError::InvalidPeriod {
            start: start_date,
            end: end_date,
        });
    }
    if end_date <= today {
        return Err(ValidationError::EndNotInFuture { end: end_date, today });
    }
    Ok(())
}
