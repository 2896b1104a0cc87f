use std::{io::IsTerminal as _, path::PathBuf};

use clap::{Parser, error::ErrorKind};
use plymgen::{BuildOptions, ConfigSource, FfmpegTool, PlymgenError, PlymgenResult};
use tracing_subscriber::EnvFilter;

/// Generate a Plymouth boot-splash theme from a video and dialog/progress images.
#[derive(Parser, Debug)]
#[command(name = "plymgen", version)]
struct Cli {
    /// Configuration file (JSON). Defaults to `config.json` when present.
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Remove animation frames left in the build directory by a previous run.
    #[arg(long)]
    clean: bool,
}

fn main() {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return;
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(PlymgenError::usage(e.to_string()).exit_code());
        }
    };

    if let Err(e) = run(cli) {
        tracing::error!("{e}");
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> PlymgenResult<()> {
    let src = match cli.config {
        Some(path) => ConfigSource::explicit(path),
        None => ConfigSource::implicit_default(),
    };
    let cfg = plymgen::load_config(&src)?;

    let opts = BuildOptions {
        clean_stale_frames: cli.clean,
    };
    let summary = plymgen::build_theme(&cfg, &FfmpegTool::default(), opts)?;

    match summary.frames.first_frame_size {
        Some((w, h)) => tracing::info!(
            "Theme '{}' ready in '{}': {} frames of {w}x{h}",
            cfg.name,
            summary.build_dir.display(),
            summary.frames.estimated
        ),
        None => tracing::warn!(
            "Theme '{}' written to '{}' but '{}' could not be read",
            cfg.name,
            summary.build_dir.display(),
            plymgen::frame_file_name(0)
        ),
    }
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}
