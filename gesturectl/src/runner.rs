//! Frame loop: acquire -> recognize -> dispatch, until told to stop.
//!
//! Recognition and dispatch run on one thread.  The loop stops on end of
//! input, on SIGINT/SIGTERM, or when the optional exit timer runs out.  The
//! source is polled with a short timeout, so stop conditions are checked at
//! least once per poll interval even when no frames arrive.  A second signal
//! while shutdown is pending exits at once.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{error, info};

use crate::action::{CommandSink, Dispatcher};
use crate::hand::engine::GestureEngine;
use crate::source::{FrameSource, Polled};

/// Global flag set by SIGTERM/SIGINT handlers.
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Install signal handlers for graceful shutdown (SIGTERM, SIGINT).
pub fn install_signal_handlers() {
    unsafe {
        libc::signal(libc::SIGTERM, signal_handler as libc::sighandler_t);
        libc::signal(libc::SIGINT, signal_handler as libc::sighandler_t);
    }
}

extern "C" fn signal_handler(_sig: libc::c_int) {
    if SHUTDOWN_REQUESTED.swap(true, Ordering::SeqCst) {
        // Already asked once and still running: stuck in a command or read
        unsafe { libc::_exit(130) };
    }
}

/// Loop settings.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Stop after this long (for scripted runs).
    pub exit_after: Option<Duration>,
    /// How often to log engine status.
    pub status_interval: Duration,
    /// Longest wait for a frame before stop conditions are rechecked.
    pub poll_interval: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            exit_after: None,
            status_interval: Duration::from_secs(60),
            poll_interval: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    Signal,
    ExitTimer,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EndOfStream => "end of input",
            Self::Signal => "shutdown signal",
            Self::ExitTimer => "exit timer",
        })
    }
}

/// What a finished run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub reason: StopReason,
    pub frames: u64,
    pub events: u64,
    pub commands_issued: u64,
    pub commands_failed: u64,
}

/// Drive `engine` and `dispatcher` from `source` until a stop condition.
///
/// Acquisition errors end the run with `Err`; nothing is retried.
pub fn run<F, S>(
    source: &mut F,
    engine: &mut GestureEngine,
    dispatcher: &mut Dispatcher<S>,
    config: &RunConfig,
) -> anyhow::Result<RunSummary>
where
    F: FrameSource,
    S: CommandSink,
{
    let start_time = Instant::now();
    let mut last_status_log = start_time;

    info!(
        "Entering frame loop (status interval: {}s, poll interval: {}ms{})",
        config.status_interval.as_secs(),
        config.poll_interval.as_millis(),
        config
            .exit_after
            .map(|d| format!(", exit after {}s", d.as_secs()))
            .unwrap_or_default(),
    );

    let reason = loop {
        // Check global shutdown flag (set by signal handler)
        if SHUTDOWN_REQUESTED.load(Ordering::SeqCst) {
            info!("Shutdown signal received, exiting");
            break StopReason::Signal;
        }

        if let Some(dur) = config.exit_after {
            if start_time.elapsed() >= dur {
                info!("Exit timer fired after {}s", dur.as_secs());
                break StopReason::ExitTimer;
            }
        }

        if last_status_log.elapsed() >= config.status_interval {
            info!("Status: {}", engine.status_sexp());
            last_status_log = Instant::now();
        }

        let mut wait = config.poll_interval;
        if let Some(dur) = config.exit_after {
            wait = wait.min(dur.saturating_sub(start_time.elapsed()));
        }

        let packet = match source.poll_frame(wait) {
            Ok(Polled::Frame(packet)) => packet,
            Ok(Polled::Idle) => continue,
            Ok(Polled::Closed) => {
                info!("Frame source closed");
                break StopReason::EndOfStream;
            }
            Err(e) => {
                error!("Frame acquisition failed: {}", e);
                return Err(e).context("frame acquisition failed");
            }
        };

        let now = Instant::now();
        for event in engine.process_frame(packet.hands, now) {
            dispatcher.dispatch(&event);
        }
    };

    let stats = dispatcher.stats();
    let summary = RunSummary {
        reason,
        frames: engine.stats().frames,
        events: engine.stats().total_fired(),
        commands_issued: stats.commands_issued,
        commands_failed: stats.commands_failed,
    };
    info!(
        "Frame loop stopped ({}): {} frame(s), {} gesture(s), {} command(s) issued, {} failed",
        summary.reason, summary.frames, summary.events, summary.commands_issued, summary.commands_failed,
    );
    Ok(summary)
}

// ── Tests ──────────────────────────────────────────────────
