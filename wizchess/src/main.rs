//! WizardChess controller - entry point.
//!
//! Reads move commands such as `knight from g1 to f3` (or the Italian
//! `cavallo da g1 a f3`) from the terminal or a script file, resolves them
//! against the board model and drives the gantry that drags the pieces.
//!
//! Runtime tunables live in [`config`]; command-line flags override them.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chess::MoveResolver;
use gantry::{GantryActuator, SimulatedBackend};

mod command;
mod config;
mod controller;
mod repl;

use repl::OutputFormat;

/// Voice-style chess commands for a robotic chessboard.
#[derive(Parser)]
#[command(name = "wizchess", about = "Robotic chessboard controller")]
struct Cli {
    /// Replay commands from a file instead of reading the terminal.
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Print moves and status snapshots as JSON lines.
    #[arg(long)]
    json: bool,

    /// Skip the simulated motor and power delays.
    #[arg(long)]
    instant: bool,

    /// Write daily rolling logs to this directory (overrides `WIZCHESS_LOG_DIR`).
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

/// Install the tracing subscriber. Logs go to stderr, and to a daily rolling
/// file when a directory is given. The returned guard flushes the file writer
/// on drop.
fn init_tracing(
    log_dir: Option<PathBuf>,
) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr = fmt::layer().with_writer(std::io::stderr);

    let (file, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("cannot create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(&dir, "wizchess");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr)
        .with(file)
        .with(filter)
        .init();
    Ok(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_dir.clone().or_else(config::get_log_dir))?;

    let gantry_config = if cli.instant {
        gantry::GantryConfig {
            power_up: Duration::ZERO,
            settle: Duration::ZERO,
            alert: Duration::ZERO,
            ..config::gantry_config()
        }
    } else {
        config::gantry_config()
    };
    let backend = if cli.instant {
        SimulatedBackend::instant()
    } else {
        SimulatedBackend::new(Duration::from_micros(config::get_pulse_us()))
    };
    tracing::info!(config = ?gantry_config, "Starting WizardChess controller");

    let resolver = MoveResolver::new(GantryActuator::new(gantry_config, backend));
    let handle = controller::spawn(resolver);
    let (initial, events) = handle.subscribe().await?;
    tracing::info!(turn = %initial.turn, "Board ready");
    let event_log = tokio::spawn(controller::log_events(events));

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mut stdout = std::io::stdout();

    let summary = match cli.script {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("cannot open script {}", path.display()))?;
            tracing::info!(script = %path.display(), "Replaying script");
            repl::run(BufReader::new(file), &handle, format, false, &mut stdout).await?
        }
        None => {
            if !cli.json {
                println!("WizardChess - type a move (e.g. `pawn to e4`), `status` or `quit`.");
            }
            let stdin = BufReader::new(tokio::io::stdin());
            repl::run(stdin, &handle, format, !cli.json, &mut stdout).await?
        }
    };

    handle.shutdown().await;
    let events = event_log.await?;
    tracing::info!(
        events,
        committed = summary.committed,
        rejected = summary.rejected,
        invalid = summary.invalid,
        "WizardChess controller shutting down"
    );
    Ok(())
}
