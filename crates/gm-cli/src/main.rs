//! CLI frontend for the Grey Map narrative progression engine.

mod commands;
mod logging;
mod tui;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "greymap",
    about = "Grey Map: revisit the places, find what was left behind",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the chapters and clues of a story
    Story {
        /// Story file (default: the built-in story)
        #[arg(short, long)]
        story: Option<PathBuf>,
    },

    /// Validate a story file
    Check {
        /// Story file to validate
        file: PathBuf,
    },

    /// Drive the engine from a script on a simulated clock
    Replay {
        /// Script file (default: an automatic full playthrough)
        script: Option<PathBuf>,

        /// Story file (default: the built-in story)
        #[arg(short, long)]
        story: Option<PathBuf>,

        /// Print the final snapshot as JSON instead of a transcript
        #[arg(long)]
        json: bool,
    },

    /// Play interactively in the terminal
    Play {
        /// Story file (default: the built-in story)
        #[arg(short, long)]
        story: Option<PathBuf>,

        /// Time multiplier (2.0 plays twice as fast)
        #[arg(long, default_value = "1.0")]
        speed: f64,

        /// Write engine logs to this file
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Story { story } => {
            logging::init_stderr();
            commands::story::run(story.as_deref())
        }
        Commands::Check { file } => {
            logging::init_stderr();
            commands::check::run(&file)
        }
        Commands::Replay {
            script,
            story,
            json,
        } => {
            logging::init_stderr();
            commands::replay::run(script.as_deref(), story.as_deref(), json)
        }
        Commands::Play {
            story,
            speed,
            log_file,
        } => log_file
            .as_deref()
            .map_or(Ok(()), logging::init_file)
            .and_then(|()| commands::play::run(story.as_deref(), speed)),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
