//! gesturectl - hand gesture recognition driving an Android device over adb
//!
//! Reads hand landmark frames from an external tracker, turns held poses
//! into debounced gesture events and replays them as taps and swipes.

mod action;
mod config;
mod hand;
mod runner;
mod source;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};

use action::{AdbSink, CommandSink, Dispatcher, DryRunSink};
use config::Config;
use hand::GestureEngine;
use runner::{RunConfig, StopReason};
use source::{JsonLinesSource, ThreadedSource};

#[derive(Parser, Debug)]
#[command(name = "gesturectl", about = "Hand gesture control for Android devices")]
struct Cli {
    /// Configuration file (s-expression plist)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Landmark frame stream, one JSON object per line ("-" for stdin)
    #[arg(long, default_value = "-")]
    input: PathBuf,

    /// Screen width in pixels (overrides config)
    #[arg(long)]
    screen_width: Option<u32>,

    /// Screen height in pixels (overrides config)
    #[arg(long)]
    screen_height: Option<u32>,

    /// adb executable (overrides config)
    #[arg(long)]
    adb_path: Option<String>,

    /// Device serial passed to adb -s (overrides config)
    #[arg(long)]
    serial: Option<String>,

    /// Log device commands instead of running them
    #[arg(long)]
    dry_run: bool,

    /// Exit after N seconds
    #[arg(long)]
    exit_after: Option<u64>,

    /// Seconds between status log lines
    #[arg(long, default_value_t = 60)]
    status_interval: u64,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("gesturectl {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesturectl=info".into()),
        )
        .init();

    info!("gesturectl v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(width) = cli.screen_width {
        config.gesture.screen_width = width;
    }
    if let Some(height) = cli.screen_height {
        config.gesture.screen_height = height;
    }
    if let Some(program) = cli.adb_path {
        config.adb.program = program;
    }
    if cli.serial.is_some() {
        config.adb.serial = cli.serial;
    }
    config.validate()?;
    debug!("config: {}", config.config_sexp());

    let sink: Box<dyn CommandSink> = if cli.dry_run {
        info!("dry run: device commands are logged, not executed");
        Box::new(DryRunSink::default())
    } else {
        info!(
            "sending commands via {}{}",
            config.adb.program,
            config
                .adb
                .serial
                .as_ref()
                .map(|s| format!(" -s {}", s))
                .unwrap_or_default(),
        );
        Box::new(AdbSink::new(config.adb.program.clone(), config.adb.serial.clone()))
    };

    let input = JsonLinesSource::open(&cli.input)
        .with_context(|| format!("opening frame source {}", cli.input.display()))?;
    let mut source = ThreadedSource::spawn(input).context("starting frame reader thread")?;
    let mut engine = GestureEngine::new(config.gesture, &config.cooldowns);
    let mut dispatcher = Dispatcher::new(config.actions, sink);
    if dispatcher.table().is_empty() {
        warn!("no gesture has an action bound; events will only be logged");
    }

    let run_config = RunConfig {
        exit_after: cli.exit_after.map(Duration::from_secs),
        status_interval: Duration::from_secs(cli.status_interval.max(1)),
        ..RunConfig::default()
    };

    // Signal handling via libc
    runner::install_signal_handlers();

    let summary = runner::run(&mut source, &mut engine, &mut dispatcher, &run_config)?;
    if summary.reason == StopReason::Signal {
        info!("Interrupted; final status {}", engine.status_sexp());
    }
    Ok(())
}
