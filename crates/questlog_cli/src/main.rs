//! Terminal front end for the QuestLog core.
//!
//! # Responsibility
//! - Parse one intent per invocation and forward it to `TrackerService`.
//! - Render returned events and state as plain text.

use clap::{Parser, Subcommand};
use log::warn;
use questlog_core::{
    init_logging_from_config, CoreConfig, CoreEvent, IntentReport, KeyValueStore, MemoryStore,
    SqliteStore, SystemClock, TaskFilter, TrackerService,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "questlog", version, about = "Task tracker with points, levels and streaks")]
struct Cli {
    /// Store database path (overrides QUESTLOG_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a task
    Add { text: String },
    /// Toggle completion of a task
    Toggle { id: String },
    /// Delete a task
    Delete { id: String },
    /// List tasks
    List {
        /// all | active | completed
        #[arg(long, default_value = "all")]
        filter: TaskFilter,
    },
    /// Show points, level and streak
    Stats,
    /// Show achievements and their progress
    Achievements,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut config = CoreConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("warning: logging disabled: {err}");
    }

    let store: Box<dyn KeyValueStore> = match SqliteStore::open(&config.db_path) {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!("event=session_open module=cli status=degraded error={err}");
            eprintln!("warning: could not open saved data ({err}); changes will not be kept");
            Box::new(MemoryStore::new())
        }
    };
    let mut tracker = TrackerService::load(store, SystemClock);
    if let Some(notice) = tracker.notice() {
        eprintln!("warning: {notice}");
    }

    match cli.command {
        Command::Add { text } => {
            let report = tracker.add_task(text);
            if report.events.is_empty() {
                println!("Nothing to add.");
            }
            print_report(&report);
        }
        Command::Toggle { id } => match tracker.toggle_task(&id) {
            Ok(report) => print_report(&report),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        },
        Command::Delete { id } => {
            let report = tracker.delete_task(&id);
            if report.events.is_empty() {
                println!("No task with id {id}.");
            }
            print_report(&report);
        }
        Command::List { filter } => {
            let tasks = tracker.tasks(filter);
            if tasks.is_empty() {
                println!("No {} tasks.", filter.as_str());
            }
            for task in tasks {
                let mark = if task.completed { "x" } else { " " };
                println!("[{mark}] {}  {}", task.id, task.text);
            }
            println!("{} item(s) left to do", tracker.ledger().remaining_count());
        }
        Command::Stats => {
            let snapshot = tracker.snapshot();
            let progress = snapshot.level_progress;
            println!("points: {}", snapshot.progression.points);
            println!(
                "level:  {} ({}/{} to level {})",
                progress.level,
                progress.points_into_level,
                progress.points_per_level,
                progress.level + 1
            );
            println!("streak: {} day(s)", snapshot.progression.streak);
            println!(
                "tasks:  {} total, {} completed, {} remaining",
                snapshot.summary.total_tasks,
                snapshot.summary.completed_tasks,
                snapshot.summary.remaining_tasks
            );
        }
        Command::Achievements => {
            for achievement in tracker.achievements() {
                let state = if achievement.unlocked { "unlocked" } else { "locked" };
                let progress = match (achievement.progress, achievement.target) {
                    (Some(progress), Some(target)) => format!(" {progress}/{target}"),
                    _ => String::new(),
                };
                println!(
                    "{} {} [{state}{progress}] {}",
                    achievement.icon, achievement.title, achievement.description
                );
            }
        }
    }

    ExitCode::SUCCESS
}

fn print_report(report: &IntentReport) {
    for event in &report.events {
        match event {
            CoreEvent::TaskAdded { id } => println!("Added {id}"),
            CoreEvent::TaskCompleted { id } => println!("Completed {id} (+10 points)"),
            CoreEvent::TaskUncompleted { id } => println!("Reopened {id} (-10 points)"),
            CoreEvent::TaskDeleted { id } => println!("Deleted {id}"),
            CoreEvent::LevelUp { level } => println!("Level up! You reached level {level}."),
            CoreEvent::AchievementUnlocked(achievement) => println!(
                "Achievement unlocked: {} {}",
                achievement.icon, achievement.title
            ),
        }
    }
    if let Some(notice) = &report.notice {
        eprintln!("warning: {notice}");
    }
}
