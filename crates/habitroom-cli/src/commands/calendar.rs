//! Month-grid view of a habit's period.

use chrono::{Datelike, NaiveDate};
use habitroom_core::{today, HabitService, HabitTracker, TrackerError};

pub fn run(name: &str, service: &HabitService) -> Result<(), Box<dyn std::error::Error>> {
    let tracker = service.tracker();
    if !tracker.contains(name) {
        return Err(TrackerError::NotFound(name.to_string()).into());
    }
    print!("{}", render(tracker, name, today()));
    Ok(())
}

/// Render every month touched by the habit's period.
///
/// Cells: `x` done, `.` open, `-` outside the period; today is prefixed with `>`.
fn render(tracker: &HabitTracker, name: &str, today: NaiveDate) -> String {
    let Some(habit) = tracker.habit(name) else {
        return String::new();
    };
    let mut out = String::new();
    let mut month_start = first_of_month(habit.start_date());

    while month_start <= habit.end_date() {
        out.push_str(&format!("{} {:04}-{:02}\n", habit.name(), month_start.year(), month_start.month()));
        out.push_str(" Mo  Tu  We  Th  Fr  Sa  Su\n");

        let lead = month_start.weekday().num_days_from_monday() as usize;
        let mut line = "    ".repeat(lead);
        let mut column = lead;

        for day in month_start.iter_days().take_while(|d| d.month() == month_start.month()) {
            let mark = if !habit.is_in_period(day) {
                '-'
            } else if tracker.is_completed(name, day) {
                'x'
            } else {
                '.'
            };
            let prefix = if day == today { '>' } else { ' ' };
            let cell = format!("{prefix}{mark}{:<2}", day.day());
            line.push_str(&cell);
            column += 1;
            if column == 7 {
                out.push_str(line.trim_end());
                out.push('\n');
                line.clear();
                column = 0;
            }
        }
        if !line.is_empty() {
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out.push('\n');

        month_start = match next_month(month_start) {
            Some(next) => next,
            None => break,
        };
    }
    out
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn next_month(first: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}
