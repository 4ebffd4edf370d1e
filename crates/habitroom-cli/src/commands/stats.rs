use habitroom_core::{today, HabitService, HabitStats, TrackerError};

pub fn run(
    name: Option<&str>,
    json: bool,
    service: &HabitService,
) -> Result<(), Box<dyn std::error::Error>> {
    let today = today();
    let stats = match name {
        Some(name) => vec![service
            .stats(name, today)
            .ok_or_else(|| TrackerError::NotFound(name.to_string()))?],
        None => service.summary(today),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }
    if stats.is_empty() {
        println!("No habits yet.");
    }
    for (i, s) in stats.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_stats(s);
    }
    Ok(())
}

/// Human-readable block for one habit.
pub fn print_stats(stats: &HabitStats) {
    println!("Habit:      {}", stats.name);
    println!("Period:     {} ~ {}", stats.start_date, stats.end_date);
    println!("Status:     {}", stats.status.label());
    println!(
        "Completion: {:.1}% ({}/{} days)",
        stats.completion_rate, stats.completed_days, stats.total_days
    );
    println!("Streak:     {} days", stats.streak);
    println!("Today:      {}", if stats.completed_today { "done" } else { "not done" });
    println!("{}", stats.tier.message());
}
