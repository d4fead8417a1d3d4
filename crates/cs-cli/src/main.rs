//! CLI frontend for the crtscene cutscene engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "crtscene",
    about = "crtscene: scripted cutscenes on a CRT monitor",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the scenes in a script
    List {
        /// Script file or directory of .json scripts (default: built-in content)
        #[arg(short, long)]
        scripts: Option<PathBuf>,
    },

    /// Show the steps of a scene
    Show {
        /// Scene name (case-sensitive)
        scene: String,

        /// Print the scene as JSON
        #[arg(long)]
        json: bool,

        /// Script file or directory of .json scripts (default: built-in content)
        #[arg(short, long)]
        scripts: Option<PathBuf>,
    },

    /// Compile scripts and report diagnostics
    Check {
        /// Script file or directory of .json scripts (default: built-in content)
        #[arg(short, long)]
        scripts: Option<PathBuf>,
    },

    /// Play a scene without a renderer, printing each line
    Play {
        /// Scene name
        scene: String,

        /// Use zero-length timers
        #[arg(long)]
        instant: bool,

        /// Script file or directory of .json scripts (default: built-in content)
        #[arg(short, long)]
        scripts: Option<PathBuf>,
    },

    /// Launch the interactive CRT monitor
    Tui {
        /// Scene to start with
        #[arg(long, default_value = "init")]
        scene: String,

        /// Write logs to this file
        #[arg(long)]
        log_file: Option<PathBuf>,

        /// Script file or directory of .json scripts (default: built-in content)
        #[arg(short, long)]
        scripts: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    // The terminal renderer owns the screen; it logs to a file instead.
    if !matches!(cli.command, Commands::Tui { .. }) {
        init_logging();
    }

    let result = match cli.command {
        Commands::List { scripts } => commands::list::run(scripts.as_deref()),
        Commands::Show {
            scene,
            json,
            scripts,
        } => commands::show::run(scripts.as_deref(), &scene, json),
        Commands::Check { scripts } => commands::check::run(scripts.as_deref()),
        Commands::Play {
            scene,
            instant,
            scripts,
        } => commands::play::run(scripts.as_deref(), &scene, instant),
        Commands::Tui {
            scene,
            log_file,
            scripts,
        } => commands::tui::run(scripts.as_deref(), &scene, log_file.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
