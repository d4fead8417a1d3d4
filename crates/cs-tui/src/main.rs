//! Standalone terminal renderer for crtscene.

use std::path::PathBuf;
use std::process;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "crtscene-tui",
    about = "Play crtscene cutscenes on a terminal CRT monitor",
    version
)]
struct Args {
    /// Script file or directory of .json scripts (default: built-in content)
    #[arg(long)]
    scripts: Option<PathBuf>,

    /// Scene to start with
    #[arg(long, default_value = "init")]
    scene: String,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), String> {
    if let Some(path) = &args.log_file {
        cs_tui::logging::init_file_logging(path)?;
    }

    let registry = match &args.scripts {
        Some(path) => cs_script::load_path(path),
        None => cs_script::builtin(),
    }
    .map_err(|e| e.to_string())?;

    cs_tui::terminal::run(registry, &args.scene).await
}
