//! Device command sinks.
//!
//! `AdbSink` drives a real device through `adb shell input`.  `DryRunSink`
//! only logs, for running without a device attached.

use std::io;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::info;

use super::Action;

/// Errors a sink can report for a single command.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}")]
    Exit { program: String, status: ExitStatus },
}

/// Something that executes device commands.
pub trait CommandSink {
    fn execute(&mut self, action: &Action) -> Result<(), CommandError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

impl CommandSink for Box<dyn CommandSink> {
    fn execute(&mut self, action: &Action) -> Result<(), CommandError> {
        (**self).execute(action)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

// ── adb ────────────────────────────────────────────────────

/// Runs `adb [-s SERIAL] shell input ...` once per command.
#[derive(Debug, Clone)]
pub struct AdbSink {
    program: String,
    serial: Option<String>,
}

impl AdbSink {
    pub fn new(program: impl Into<String>, serial: Option<String>) -> Self {
        Self {
            program: program.into(),
            serial,
        }
    }

    /// Full argument list for one action.
    pub fn build_args(&self, action: &Action) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(serial) = &self.serial {
            args.push("-s".to_string());
            args.push(serial.clone());
        }
        args.push("shell".to_string());
        args.push("input".to_string());
        args.extend(action.input_args());
        args
    }
}

impl CommandSink for AdbSink {
    fn execute(&mut self, action: &Action) -> Result<(), CommandError> {
        let status = Command::new(&self.program)
            .args(self.build_args(action))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .map_err(|source| CommandError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(CommandError::Exit {
                program: self.program.clone(),
                status,
            });
        }
        info!("Command executed: {}", action);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "adb"
    }
}

// ── Dry run ────────────────────────────────────────────────

/// Logs each command instead of running it.
#[derive(Debug, Clone, Default)]
pub struct DryRunSink {
    executed: u64,
}

impl DryRunSink {
    pub fn executed(&self) -> u64 {
        self.executed
    }
}

impl CommandSink for DryRunSink {
    fn execute(&mut self, action: &Action) -> Result<(), CommandError> {
        self.executed += 1;
        info!("Dry run: input {}", action.input_args().join(" "));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "dry-run"
    }
}

// ── Test sink ──────────────────────────────────────────────

/// Records every action with the instant it arrived.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub calls: Vec<(Action, std::time::Instant)>,
    /// Report every command as failed (after recording it).
    pub fail: bool,
}

#[cfg(test)]
impl RecordingSink {
    pub fn actions(&self) -> Vec<Action> {
        self.calls.iter().map(|(a, _)| *a).collect()
    }
}

#[cfg(test)]
impl CommandSink for RecordingSink {
    fn execute(&mut self, action: &Action) -> Result<(), CommandError> {
        self.calls.push((*action, std::time::Instant::now()));
        if self.fail {
            return Err(CommandError::Spawn {
                program: "recording".into(),
                source: io::Error::new(io::ErrorKind::Other, "forced failure"),
            });
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
