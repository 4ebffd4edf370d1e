//! Daily completion commands.

use chrono::NaiveDate;
use clap::Args;
use habitroom_core::{HabitService, TrackerError};

#[derive(Args)]
pub struct DayArgs {
    /// Habit name
    pub name: String,
    /// Day to change, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl DayArgs {
    /// Resolve the target day and make sure it lies in the habit's period.
    fn resolve(&self, service: &HabitService) -> Result<NaiveDate, Box<dyn std::error::Error>> {
        let habit = service
            .tracker()
            .habit(&self.name)
            .ok_or_else(|| TrackerError::NotFound(self.name.clone()))?;
        let date = self.date.unwrap_or_else(habitroom_core::today);
        if !habit.is_in_period(date) {
            return Err(format!(
                "{date} is outside the period of '{}' ({} ~ {})",
                habit.name(),
                habit.start_date(),
                habit.end_date()
            )
            .into());
        }
        Ok(date)
    }
}

pub fn check(args: DayArgs, service: &mut HabitService) -> Result<(), Box<dyn std::error::Error>> {
    let date = args.resolve(service)?;
    if service.mark_completed(&args.name, date) {
        println!("Checked {} on {date}", args.name);
    } else {
        println!("{} was already checked on {date}", args.name);
    }
    Ok(())
}

pub fn uncheck(args: DayArgs, service: &mut HabitService) -> Result<(), Box<dyn std::error::Error>> {
    let date = args.resolve(service)?;
    if service.remove_completed(&args.name, date) {
        println!("Unchecked {} on {date}", args.name);
    } else {
        println!("{} was not checked on {date}", args.name);
    }
    Ok(())
}

pub fn toggle(args: DayArgs, service: &mut HabitService) -> Result<(), Box<dyn std::error::Error>> {
    let date = args.resolve(service)?;
    match service.toggle_completed(&args.name, date) {
        Some(true) => println!("Checked {} on {date}", args.name),
        Some(false) => println!("Unchecked {} on {date}", args.name),
        None => return Err(TrackerError::NotFound(args.name).into()),
    }
    Ok(())
}
