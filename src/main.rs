//! Goalmet - personal goal tracking
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use goalmet::cli::{
    AddCommand, DeleteCommand, ListCommand, OutputOptions, ShowCommand, TrackCommand,
    UntrackCommand,
};
use goalmet::config::{goalmet_home, Config, Target};
use goalmet::error::exit_codes;
use goalmet::{logging, storage, App, EntryId, GoalId};

// =============================================================================
// CLI Definition
// =============================================================================

/// Goalmet - track progress on personal goals
#[derive(Parser)]
#[command(name = "goalmet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output as JSON
    #[arg(long, short, global = true)]
    json: bool,
    /// Suppress output
    #[arg(long, short, global = true)]
    quiet: bool,
    /// Storage backend to use (overrides config)
    #[arg(long, value_enum, global = true)]
    target: Option<Target>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all goals
    List,

    /// Show one goal with its tracking entries
    Show {
        /// Goal ID
        goal_id: u64,
    },

    /// Add a goal
    Add {
        /// Goal title
        title: String,
    },

    /// Delete a goal and all of its tracking entries
    Delete {
        /// Goal ID
        goal_id: u64,
    },

    /// Record a note against a goal
    Track {
        /// Goal ID
        goal_id: u64,
        /// The note (may be empty)
        #[arg(default_value = "")]
        note: String,
    },

    /// Delete a tracking entry from a goal
    Untrack {
        /// Goal ID
        goal_id: u64,
        /// Entry ID
        entry_id: u64,
    },
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();

    let cli = Cli::parse();
    let mut config = Config::load();
    if let Some(target) = cli.target {
        config.storage.target = target;
    }
    logging::init(&config.logging);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("goalmet error: {}", e);
            return ExitCode::from(exit_codes::CRASH as u8);
        }
    };

    match runtime.block_on(run(cli, config)) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::from(exit_codes::SUCCESS as u8)
        }
        Err(e) => {
            eprintln!("goalmet error: {}", e);
            ExitCode::from(exit_codes::CRASH as u8)
        }
    }
}

/// Set up the global panic handler.
///
/// On panic, logs to ~/.goalmet/crash.log and exits with the crash code.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("goalmet panic: {}", info);

        if let Some(home) = goalmet_home() {
            let crash_log = home.join("crash.log");
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Run one command against a freshly started app and return its output.
async fn run(cli: Cli, config: Config) -> goalmet::Result<String> {
    let adapter = storage::create_adapter(&config.storage)?;
    let mut app = App::start(adapter, config.storage.key.clone()).await;
    let options = OutputOptions {
        json: cli.json,
        quiet: cli.quiet,
    };

    let output = match cli.command {
        Commands::List => {
            let cmd = ListCommand::new(&app);
            cmd.format_output(&cmd.run(), &options)
        }
        Commands::Show { goal_id } => {
            let cmd = ShowCommand::new(&app);
            cmd.format_output(&cmd.run(GoalId(goal_id)), &options)
        }
        Commands::Add { title } => {
            let mut cmd = AddCommand::new(&mut app);
            let result = cmd.run(&title);
            cmd.format_output(&result, &options)
        }
        Commands::Delete { goal_id } => {
            let mut cmd = DeleteCommand::new(&mut app);
            let result = cmd.run(GoalId(goal_id));
            cmd.format_output(&result, &options)
        }
        Commands::Track { goal_id, note } => {
            let mut cmd = TrackCommand::new(&mut app);
            let result = cmd.run(GoalId(goal_id), &note);
            cmd.format_output(&result, &options)
        }
        Commands::Untrack { goal_id, entry_id } => {
            let mut cmd = UntrackCommand::new(&mut app);
            let result = cmd.run(GoalId(goal_id), EntryId(entry_id));
            cmd.format_output(&result, &options)
        }
    };

    app.shutdown().await;
    Ok(output)
}
