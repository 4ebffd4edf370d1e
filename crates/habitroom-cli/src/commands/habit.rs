//! Habit management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use habitroom_core::{today, validate_new_habit, HabitService, TrackerError};

use super::stats::print_stats;

#[derive(Subcommand)]
pub enum HabitAction {
    /// Register a new habit
    Add {
        /// Habit name (must be unique)
        name: String,
        /// First day, YYYY-MM-DD (default: today)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day, YYYY-MM-DD
        #[arg(long)]
        end: NaiveDate,
        /// Allow periods that start before today or end today
        #[arg(long)]
        allow_past: bool,
    },
    /// List habits
    List {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one habit with its statistics
    Show {
        /// Habit name
        name: String,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a habit's period; marks outside the new period are dropped
    Dates {
        /// Habit name
        name: String,
        /// New first day, YYYY-MM-DD
        #[arg(long)]
        start: NaiveDate,
        /// New last day, YYYY-MM-DD
        #[arg(long)]
        end: NaiveDate,
    },
    /// Delete a habit and its records
    Remove {
        /// Habit name
        name: String,
    },
}

pub fn run(action: HabitAction, service: &mut HabitService) -> Result<(), Box<dyn std::error::Error>> {
    let today = today();

    match action {
        HabitAction::Add {
            name,
            start,
            end,
            allow_past,
        } => {
            let name = name.trim();
            let start = start.unwrap_or(today);
            if !allow_past {
                validate_new_habit(name, start, end, today)?;
            }
            let habit = service.create_habit(name, start, end)?;
            println!(
                "Habit created: {} ({} ~ {}, {} days)",
                habit.name(),
                habit.start_date(),
                habit.end_date(),
                habit.total_days()
            );
        }
        HabitAction::List { json } => {
            let habits = service.tracker().habits();
            if json {
                println!("{}", serde_json::to_string_pretty(habits)?);
            } else if habits.is_empty() {
                println!("No habits yet.");
            } else {
                for habit in habits {
                    let checked = service.tracker().is_completed(habit.name(), today);
                    println!(
                        "{} {} ({} ~ {}) [{}/{}] {:.1}%",
                        if checked { "[x]" } else { "[ ]" },
                        habit.name(),
                        habit.start_date(),
                        habit.end_date(),
                        service.tracker().completed_days_count(habit.name()),
                        habit.total_days(),
                        service.tracker().completion_rate(habit.name()),
                    );
                }
            }
        }
        HabitAction::Show { name, json } => {
            let stats = service
                .stats(&name, today)
                .ok_or_else(|| TrackerError::NotFound(name.clone()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
        }
        HabitAction::Dates { name, start, end } => {
            if !service.update_habit_dates(&name, start, end)? {
                return Err(TrackerError::NotFound(name).into());
            }
            println!("Habit updated: {name} ({start} ~ {end})");
        }
        HabitAction::Remove { name } => {
            if !service.remove_habit(&name) {
                return Err(TrackerError::NotFound(name).into());
            }
            println!("Habit removed: {name}");
        }
    }
    Ok(())
}
