use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "habitroom", version, about = "Habitroom CLI")]
struct Cli {
    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Mark a habit as done for a day
    Check(commands::check::DayArgs),
    /// Clear a habit's mark for a day
    Uncheck(commands::check::DayArgs),
    /// Flip a habit's mark for a day
    Toggle(commands::check::DayArgs),
    /// Show a habit's period as a month calendar
    Calendar {
        /// Habit name
        name: String,
    },
    /// Progress statistics
    Stats {
        /// Only this habit
        name: Option<String>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Habit { action } => commands::with_service(|s| commands::habit::run(action, s)),
        Commands::Check(args) => commands::with_service(|s| commands::check::check(args, s)),
        Commands::Uncheck(args) => commands::with_service(|s| commands::check::uncheck(args, s)),
        Commands::Toggle(args) => commands::with_service(|s| commands::check::toggle(args, s)),
        Commands::Calendar { name } => commands::with_service(|s| commands::calendar::run(&name, s)),
        Commands::Stats { name, json } => {
            commands::with_service(|s| commands::stats::run(name.as_deref(), json, s))
        }
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "habitroom", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
