//! Letter Stages - capital letter trainer for the terminal
//!
//! Single-player, single-session, nothing persisted.
//! Letters are presented stage by stage; a correct keypress (or a click on
//! the on-screen keyboard) plays an effect and moves on to the next letter.

mod app;
mod cli;
mod config;
mod effects;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use config::{GameConfig, Timings};
use effects::PresentationMode;
use session::StageTable;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_LOG_FILE: &str = ".letter-stages/logs/letter-stages.log";
/// Accepted `--speed` range; outside it delays are unplayable or overflow
const SPEED_RANGE: std::ops::RangeInclusive<f64> = 0.1..=10.0;

#[derive(Parser, Debug)]
#[command(name = "Letter Stages")]
#[command(about = "Learn the alphabet one stage at a time")]
struct Args {
    /// Presentation style (auto picks from terminal size and colour support)
    #[arg(short, long, value_enum, default_value_t = PresentationMode::Auto)]
    presentation: PresentationMode,

    /// JSON stage table, e.g. {"stages": ["ABC", "DEF"]}
    #[arg(short, long)]
    stages: Option<PathBuf>,

    /// Effect speed multiplier, 0.1 to 10 (2.0 = twice as fast)
    #[arg(long, default_value = "1.0", value_parser = parse_speed)]
    speed: f64,

    /// Disable sound cues
    #[arg(short, long)]
    mute: bool,

    /// Log file path
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn parse_speed(raw: &str) -> Result<f64, String> {
    let speed: f64 = raw.parse().map_err(|e| format!("{raw:?} is not a number: {e}"))?;
    if SPEED_RANGE.contains(&speed) {
        Ok(speed)
    } else {
        Err(format!(
            "speed must be between {} and {}, got {raw}",
            SPEED_RANGE.start(),
            SPEED_RANGE.end()
        ))
    }
}

/// Log to a file; the terminal belongs to the game
fn init_tracing(path: &Path, debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("⚠ Could not create log dir {}: {e}", parent.display());
        }
    }

    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .init();
            tracing::info!(path = %path.display(), "logging initialized");
        }
        Err(e) => {
            // No logs beats logs drawn over the game
            eprintln!("⚠ Could not open log file {}: {e}", path.display());
            tracing_subscriber::registry().with(env_filter).init();
        }
    }
}

fn load_stages(path: Option<&Path>) -> Result<StageTable> {
    match path {
        Some(path) => StageTable::load(path)
            .with_context(|| format!("could not load stage table from {}", path.display())),
        None => Ok(StageTable::alphabet()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_file, args.debug);

    let stages = load_stages(args.stages.as_deref())?;
    let config = GameConfig {
        stages,
        timings: Timings::default().scaled(args.speed),
        presentation: args.presentation,
        sound: !args.mute,
    };
    tracing::info!(
        stages = config.stages.len(),
        speed = args.speed,
        presentation = ?config.presentation,
        sound = config.sound,
        "starting"
    );

    let summary = app::run(config).await?;

    println!("\n🔤 Letter Stages");
    println!(
        "📊 {} letters | {} wrong guesses | {}/{} stages | {:.1}s",
        summary.letters_answered,
        summary.wrong_guesses,
        summary.stages_cleared,
        summary.total_stages,
        summary.duration_secs
    );
    if summary.completed {
        println!("🏆 All stages complete!");
    }

    Ok(())
}
