use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use liftlog_core::rotation::{parse_cycle, parse_rest_target};
use liftlog_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Workout rotation tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Answer every missed day with this outcome (done, skip, rest)
    #[arg(long, global = true)]
    backfill: Option<LogStatus>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's workout, streak and rotation (default)
    Status,

    /// Log today's workout as done and advance the rotation
    Done,

    /// Log today as a rest day; the workout stays queued
    Rest,

    /// Show this week's schedule with predicted rest days
    Schedule,

    /// Replace the workout cycle and reset the position
    Cycle {
        /// Workout types separated by commas, e.g. "push, pull, legs"
        labels: String,
    },

    /// Set how many rest days to aim for each week (0-7)
    RestTarget {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Show recent log entries
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    liftlog_core::logging::init_with_level(if cli.verbose { "debug" } else { "warn" });

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let mut tracker = FileTracker::open_in(&data_dir, &config, CliNotifier)?;

    // Missed days are settled before anything else, like on app start
    let outcome = match cli.backfill {
        Some(status) => tracker.reconcile(today, &mut |date: NaiveDate, workout: &str| {
            println!(
                "Missed: {} ({}) -> {}",
                date.format("%A %b %-d"),
                title_case(workout),
                status
            );
            Some(status)
        })?,
        None => tracker.reconcile(today, &mut prompt_missed_day)?,
    };
    if !outcome.is_complete() {
        println!(
            "Backfill paused with {} missed day(s) left; run again to continue.",
            outcome.remaining
        );
    }

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => cmd_status(&tracker, today),
        Commands::Done => cmd_done(&mut tracker, today),
        Commands::Rest => cmd_rest(&mut tracker, today),
        Commands::Schedule => cmd_schedule(&tracker, today),
        Commands::Cycle { labels } => cmd_cycle(&mut tracker, &labels),
        Commands::RestTarget { value } => cmd_rest_target(&mut tracker, &value),
        Commands::History { limit } => cmd_history(&tracker, limit),
    }
}

fn cmd_status(tracker: &FileTracker<CliNotifier>, today: NaiveDate) -> Result<()> {
    let summary = tracker.summary(today)?;

    if summary.streak > 0 {
        println!("🔥 {} day streak", summary.streak);
        println!();
    }

    match &summary.today_entry {
        Some(entry) if entry.is_rest() => {
            println!("😴 Rest");
            println!("Today's workout logged!");
        }
        Some(entry) => {
            println!("✅ {}", title_case(&entry.workout_type));
            println!("Today's workout logged!");
        }
        None => {
            println!("🏋️ {}", title_case(&summary.current_workout));
            println!("Today: {} Day", title_case(&summary.current_workout));
        }
    }
    println!();

    println!(
        "😴 Rest: {}/{} this week",
        summary.rest_taken, summary.rest_target
    );
    println!();

    println!("— Rotation —");
    for (i, workout) in summary.cycle.iter().enumerate() {
        let arrow = if i == summary.position { "→ " } else { "  " };
        println!("  {}{}", arrow, title_case(workout));
    }

    Ok(())
}

fn cmd_done(tracker: &mut FileTracker<CliNotifier>, today: NaiveDate) -> Result<()> {
    if tracker.mark_done(today)?.is_none() {
        println!("Today's workout already logged.");
    }
    Ok(())
}

fn cmd_rest(tracker: &mut FileTracker<CliNotifier>, today: NaiveDate) -> Result<()> {
    if tracker.mark_rest(today)?.is_none() {
        println!("Today's workout already logged.");
    }
    Ok(())
}

fn cmd_schedule(tracker: &FileTracker<CliNotifier>, today: NaiveDate) -> Result<()> {
    let week = tracker.week_schedule(today)?;
    print!("📅 {}", week);
    Ok(())
}

fn cmd_cycle(tracker: &mut FileTracker<CliNotifier>, input: &str) -> Result<()> {
    let labels = parse_cycle(input);
    if !tracker.edit_cycle(labels.as_slice())? {
        println!("Cycle unchanged: enter workout types separated by commas.");
    }
    Ok(())
}

fn cmd_rest_target(tracker: &mut FileTracker<CliNotifier>, input: &str) -> Result<()> {
    let accepted = match parse_rest_target(input) {
        Some(n) => tracker.edit_rest_target(n)?,
        None => false,
    };
    if !accepted {
        println!(
            "Rest target unchanged: expected a whole number from 0 to {}.",
            MAX_REST_DAYS_PER_WEEK
        );
    }
    Ok(())
}

fn cmd_history(tracker: &FileTracker<CliNotifier>, limit: usize) -> Result<()> {
    let entries = tracker.history(limit)?;
    if entries.is_empty() {
        println!("No workouts logged yet.");
        return Ok(());
    }
    for entry in entries {
        let mark = if entry.status == LogStatus::Done { "+" } else { "-" };
        println!(
            "  {}  {}  {} ({})",
            entry.date,
            mark,
            title_case(&entry.workout_type),
            entry.status
        );
    }
    Ok(())
}

/// Prints state changes the way the menu bar notifications read
struct CliNotifier;

impl Notifier for CliNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::info!("{:?}", notification);
        match notification {
            Notification::WorkoutLogged { workout, next } => {
                println!("\n✓ Workout Logged 💪");
                println!("  {} — Done!", title_case(workout));
                println!("  Next up: {}", title_case(next));
            }
            Notification::RestLogged { queued } => {
                println!("\n✓ Rest Day 😴");
                println!("  {} stays queued", title_case(queued));
                println!("  Recovery is part of the process!");
            }
            Notification::CycleUpdated { cycle } => {
                let names: Vec<String> = cycle.iter().map(|w| title_case(w)).collect();
                println!("\n✓ Cycle Updated");
                println!("  New cycle: {}", names.join(", "));
                println!("  Position reset to start.");
            }
            Notification::RestTargetUpdated { rest_days_per_week } => {
                println!("\n✓ Rest target set to {} days/week", rest_days_per_week);
            }
            Notification::Backfilled { days } => {
                println!("✓ Backfilled {} missed day(s)\n", days);
            }
        }
    }
}

/// Ask on stdin what happened on a missed day
///
/// End of input or an unrecognised answer leaves the day undecided.
fn prompt_missed_day(date: NaiveDate, workout: &str) -> Option<LogStatus> {
    println!("─────────────────────────────────────────");
    println!("Missed: {}", date.format("%A %b %-d"));
    println!("Scheduled workout: {}", title_case(workout));
    println!("Did you do it? [d]one / [s]kip / [r]est");
    print!("> ");
    if let Err(e) = io::stdout().flush() {
        tracing::warn!("Failed to flush prompt: {}", e);
    }

    let mut input = String::new();
    match io::stdin().lock().read_line(&mut input) {
        Ok(0) => None,
        Ok(_) => match input.parse::<LogStatus>() {
            Ok(status) => Some(status),
            Err(e) => {
                println!("{}; stopping backfill.", e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read decision: {}", e);
            None
        }
    }
}
