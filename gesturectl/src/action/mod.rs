//! Gesture -> device command mapping and dispatch.
//!
//! Each fired gesture maps to one `ActionCommand`, which may chain further
//! commands with a delay in between.  Chains run to completion on the
//! calling thread; the delay is a real sleep so the sink sees the steps
//! apart.

pub mod sink;

use std::collections::HashMap;
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::hand::{GestureEvent, GestureKind};

pub use sink::{AdbSink, CommandError, CommandSink, DryRunSink};

// ── Actions ────────────────────────────────────────────────

/// A single device-level input command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Tap {
        x: i32,
        y: i32,
    },
    Swipe {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        duration_ms: Option<u32>,
    },
}

impl Action {
    /// Arguments to `input` on the device.
    pub fn input_args(&self) -> Vec<String> {
        match *self {
            Action::Tap { x, y } => vec!["tap".into(), x.to_string(), y.to_string()],
            Action::Swipe {
                x1,
                y1,
                x2,
                y2,
                duration_ms,
            } => {
                let mut args = vec![
                    "swipe".into(),
                    x1.to_string(),
                    y1.to_string(),
                    x2.to_string(),
                    y2.to_string(),
                ];
                if let Some(ms) = duration_ms {
                    args.push(ms.to_string());
                }
                args
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tap { x, y } => write!(f, "tap({}, {})", x, y),
            Action::Swipe {
                x1,
                y1,
                x2,
                y2,
                duration_ms: Some(ms),
            } => write!(f, "swipe({},{} -> {},{}, {}ms)", x1, y1, x2, y2, ms),
            Action::Swipe {
                x1,
                y1,
                x2,
                y2,
                duration_ms: None,
            } => write!(f, "swipe({},{} -> {},{})", x1, y1, x2, y2),
        }
    }
}

/// An action, optionally followed by another after a delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCommand {
    pub action: Action,
    /// Wait after `action` before running `then`.
    pub post_delay: Option<Duration>,
    pub then: Option<Box<ActionCommand>>,
}

impl ActionCommand {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            post_delay: None,
            then: None,
        }
    }

    pub fn tap(x: i32, y: i32) -> Self {
        Self::new(Action::Tap { x, y })
    }

    pub fn swipe(x1: i32, y1: i32, x2: i32, y2: i32, duration_ms: Option<u32>) -> Self {
        Self::new(Action::Swipe {
            x1,
            y1,
            x2,
            y2,
            duration_ms,
        })
    }

    /// Append `next` to the end of the chain, `delay` after the current last step.
    pub fn followed_by(mut self, delay: Duration, next: ActionCommand) -> Self {
        self.append(delay, next);
        self
    }

    fn append(&mut self, delay: Duration, next: ActionCommand) {
        if let Some(tail) = self.then.as_mut() {
            tail.append(delay, next);
            return;
        }
        self.post_delay = Some(delay);
        self.then = Some(Box::new(next));
    }

    /// The chain as (action, delay-after) pairs, in execution order.
    pub fn steps(&self) -> Vec<(Action, Option<Duration>)> {
        let mut steps = Vec::new();
        let mut current = Some(self);
        while let Some(cmd) = current {
            let delay = cmd.then.as_ref().and(cmd.post_delay);
            steps.push((cmd.action, delay));
            current = cmd.then.as_deref();
        }
        steps
    }
}

impl fmt::Display for ActionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.action)?;
        if let Some(next) = &self.then {
            let ms = self.post_delay.unwrap_or_default().as_millis();
            write!(f, " -> wait {}ms -> {}", ms, next)?;
        }
        Ok(())
    }
}

// ── Action table ───────────────────────────────────────────

/// Command bound to each gesture.  The coordinates are calibrated for one
/// target device and are meant to be overridden from the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionTable {
    bindings: HashMap<GestureKind, ActionCommand>,
}

/// Delay between the two taps of the "like" sequence.
pub const LIKE_DELAY: Duration = Duration::from_millis(500);

impl Default for ActionTable {
    fn default() -> Self {
        let bindings = [
            (GestureKind::OneFinger, ActionCommand::tap(108, 2183)),
            (GestureKind::TwoFingers, ActionCommand::tap(324, 2183)),
            (GestureKind::ThreeFingers, ActionCommand::tap(540, 2183)),
            (GestureKind::FourFingers, ActionCommand::tap(756, 2183)),
            (GestureKind::FiveFingers, ActionCommand::tap(972, 2183)),
            (GestureKind::OkSign, ActionCommand::tap(540, 1200)),
            (
                GestureKind::ThumbsUp,
                ActionCommand::tap(540, 1200).followed_by(LIKE_DELAY, ActionCommand::tap(108, 2183)),
            ),
            (GestureKind::ScrollUp, ActionCommand::swipe(500, 300, 500, 900, None)),
            (GestureKind::ScrollDown, ActionCommand::swipe(500, 700, 500, 300, None)),
            (GestureKind::SwipeRight, ActionCommand::swipe(200, 860, 1000, 860, Some(300))),
            (GestureKind::SwipeLeft, ActionCommand::swipe(800, 860, 200, 860, Some(300))),
            (GestureKind::GoBack, ActionCommand::tap(90, 150)),
        ];
        Self {
            bindings: bindings.into_iter().collect(),
        }
    }
}

impl ActionTable {
    pub fn get(&self, kind: GestureKind) -> Option<&ActionCommand> {
        self.bindings.get(&kind)
    }

    /// Bind a command, returning the one it replaces.
    pub fn bind(&mut self, kind: GestureKind, command: ActionCommand) -> Option<ActionCommand> {
        self.bindings.insert(kind, command)
    }

    pub fn unbind(&mut self, kind: GestureKind) -> Option<ActionCommand> {
        self.bindings.remove(&kind)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ── Dispatcher ─────────────────────────────────────────────

/// Result of dispatching one gesture event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Steps the sink accepted.
    pub issued: usize,
    /// Steps the sink rejected.
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchStats {
    pub events: u64,
    pub commands_issued: u64,
    pub commands_failed: u64,
}

/// Runs the command bound to each fired gesture against a sink.
pub struct Dispatcher<S: CommandSink> {
    table: ActionTable,
    sink: S,
    stats: DispatchStats,
}

impl<S: CommandSink> Dispatcher<S> {
    pub fn new(table: ActionTable, sink: S) -> Self {
        Self {
            table,
            sink,
            stats: DispatchStats::default(),
        }
    }

    /// Execute the chain bound to `event.kind`.
    ///
    /// A failing step is logged and the chain carries on, so a multi-step
    /// binding always issues every step.  Cooldown is never rolled back.
    pub fn dispatch(&mut self, event: &GestureEvent) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let Some(command) = self.table.get(event.kind) else {
            debug!("No action bound to {}", event.kind);
            return outcome;
        };
        self.stats.events += 1;

        let steps = command.steps();
        let last = steps.len().saturating_sub(1);
        for (i, (action, delay)) in steps.into_iter().enumerate() {
            match self.sink.execute(&action) {
                Ok(()) => outcome.issued += 1,
                Err(e) => {
                    outcome.failed += 1;
                    warn!("{} for {} failed: {}", action, event.kind, e);
                }
            }
            if i < last {
                if let Some(delay) = delay {
                    thread::sleep(delay);
                }
            }
        }

        self.stats.commands_issued += outcome.issued as u64;
        self.stats.commands_failed += outcome.failed as u64;
        let elapsed = Instant::now().saturating_duration_since(event.timestamp);
        debug!(
            "Dispatched {} via {} ({} ok, {} failed, {}ms after detection)",
            event.kind,
            self.sink.name(),
            outcome.issued,
            outcome.failed,
            elapsed.as_millis(),
        );
        outcome
    }

    pub fn table(&self) -> &ActionTable {
        &self.table
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }
}

// ── Tests ──────────────────────────────────────────────────
