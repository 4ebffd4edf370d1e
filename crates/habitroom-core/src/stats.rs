//! Derived per-habit statistics for display.
//!
//! Everything here is computed from a [`HabitTracker`] and a reference day;
//! nothing is stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::habit::{Habit, HabitStatus};
use crate::tracker::HabitTracker;

/// Rate thresholds separating the progress tiers (percent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub excellent: f64,
    pub good: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            excellent: 80.0,
            good: 50.0,
        }
    }
}

/// Display bucket for a completion rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressTier {
    Excellent,
    Good,
    NeedsWork,
}

impl ProgressTier {
    pub fn from_rate(rate: f64, thresholds: TierThresholds) -> Self {
        if rate >= thresholds.excellent {
            ProgressTier::Excellent
        } else if rate >= thresholds.good {
            ProgressTier::Good
        } else {
            ProgressTier::NeedsWork
        }
    }

    /// Encouragement shown next to the rate.
    pub fn message(&self) -> &'static str {
        match self {
            ProgressTier::Excellent => "Great job! Keep it going!",
            ProgressTier::Good => "Nice! Just a little more effort!",
            ProgressTier::NeedsWork => "Now is a good time to start!",
        }
    }
}

/// Snapshot of one habit's progress as of a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitStats {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: u32,
    pub completed_days: usize,
    /// Percentage in `[0, 100]`
    pub completion_rate: f64,
    pub streak: u32,
    pub status: HabitStatus,
    pub tier: ProgressTier,
    /// Whether `today` is already checked off
    pub completed_today: bool,
}

impl HabitStats {
    pub fn compute(
        tracker: &HabitTracker,
        habit: &Habit,
        today: NaiveDate,
        thresholds: TierThresholds,
    ) -> Self {
        let name = habit.name();
        let completion_rate = tracker.completion_rate(name);
        Self {
            name: name.to_string(),
            start_date: habit.start_date(),
            end_date: habit.end_date(),
            total_days: habit.total_days(),
            completed_days: tracker.completed_days_count(name),
            completion_rate,
            streak: tracker.compute_streak(name, today),
            status: habit.status(today),
            tier: ProgressTier::from_rate(completion_rate, thresholds),
            completed_today: tracker.is_completed(name, today),
        }
    }
}

/// Stats for every habit, in tracker order.
pub fn tracker_summary(
    tracker: &HabitTracker,
    today: NaiveDate,
    thresholds: TierThresholds,
) -> Vec<HabitStats> {
    tracker
        .habits()
        .iter()
        .map(|habit| HabitStats::compute(tracker, habit, today, thresholds))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn tier_boundaries() {
        let t = TierThresholds::default();
        assert_eq!(ProgressTier::from_rate(80.0, t), ProgressTier::Excellent);
        assert_eq!(ProgressTier::from_rate(79.9, t), ProgressTier::Good);
        assert_eq!(ProgressTier::from_rate(50.0, t), ProgressTier::Good);
        assert_eq!(ProgressTier::from_rate(0.0, t), ProgressTier::NeedsWork);
    }

    #[test]
    fn custom_thresholds() {
        let t = TierThresholds {
            excellent: 95.0,
            good: 10.0,
        };
        assert_eq!(ProgressTier::from_rate(90.0, t), ProgressTier::Good);
        assert_eq!(ProgressTier::from_rate(9.0, t), ProgressTier::NeedsWork);
    }

    #[test]
    fn compute_collects_all_fields() {
        let mut tracker = HabitTracker::new();
        tracker
            .add_habit(Habit::new("Run", d(2024, 1, 1), d(2024, 1, 10)).unwrap())
            .unwrap();
        for day in 7..=10 {
            tracker.mark_completed("Run", d(2024, 1, day));
        }

        let summary = tracker_summary(&tracker, d(2024, 1, 10), TierThresholds::default());
        assert_eq!(summary.len(), 1);
        let stats = &summary[0];
        assert_eq!(stats.total_days, 10);
        assert_eq!(stats.completed_days, 4);
        assert_eq!(stats.completion_rate, 40.0);
        assert_eq!(stats.streak, 4);
        assert_eq!(stats.status, HabitStatus::InProgress);
        assert_eq!(stats.tier, ProgressTier::NeedsWork);
        assert!(stats.completed_today);
    }
}
