//! Frame acquisition.
//!
//! The landmark detector runs out of process and writes one JSON object per
//! camera frame:
//!
//! ```json
//! {"hands": [[{"x": 0.41, "y": 0.77, "z": -0.02}, ...21 points...], ...]}
//! ```
//!
//! Hands are passed on unvalidated; the engine rejects malformed ones
//! individually.
//!
//! `ThreadedSource` moves the blocking read onto its own thread so the frame
//! loop can wait with a timeout and still notice stop requests while the
//! tracker is silent.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::hand::landmarks::Landmark;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("frame source read failed: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: bad frame: {source}")]
    Parse {
        line: u64,
        #[source]
        source: serde_json::Error,
    },
}

/// All hands detected in one camera frame.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FramePacket {
    #[serde(default)]
    pub hands: Vec<Vec<Landmark>>,
}

/// Outcome of waiting a bounded time for a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Polled {
    Frame(FramePacket),
    /// Nothing arrived within the timeout.
    Idle,
    Closed,
}

/// A supplier of frames.
pub trait FrameSource {
    /// Next frame, `Ok(None)` at end of stream.  May block indefinitely.
    fn next_frame(&mut self) -> Result<Option<FramePacket>, SourceError>;

    /// Wait at most `timeout` for the next frame.
    ///
    /// The default ignores the timeout and blocks in `next_frame`.
    fn poll_frame(&mut self, _timeout: Duration) -> Result<Polled, SourceError> {
        Ok(match self.next_frame()? {
            Some(packet) => Polled::Frame(packet),
            None => Polled::Closed,
        })
    }
}

/// Reads newline-delimited JSON frames.
pub struct JsonLinesSource<R: BufRead> {
    reader: R,
    line: u64,
    buf: String,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    /// Lines consumed so far, blank ones included.
    pub fn line(&self) -> u64 {
        self.line
    }
}

impl JsonLinesSource<Box<dyn BufRead + Send>> {
    /// Open a file, or stdin for `-`.
    pub fn open(path: &Path) -> io::Result<Self> {
        let reader: Box<dyn BufRead + Send> = if path.as_os_str() == "-" {
            Box::new(BufReader::new(io::stdin()))
        } else {
            Box::new(BufReader::new(File::open(path)?))
        };
        Ok(Self::new(reader))
    }
}

impl<R: BufRead> FrameSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Result<Option<FramePacket>, SourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }
            let packet = serde_json::from_str(text).map_err(|source| SourceError::Parse {
                line: self.line,
                source,
            })?;
            return Ok(Some(packet));
        }
    }
}

// ── Reader thread ──────────────────────────────────────────

/// Frames buffered between the reader thread and the frame loop.
const QUEUE_DEPTH: usize = 4;

type Item = Result<Option<FramePacket>, SourceError>;

/// Runs a blocking source on a reader thread and hands frames over a channel.
///
/// The thread stops after forwarding end of stream or an error.  If it is
/// still blocked in a read when the process exits, it is simply abandoned.
pub struct ThreadedSource {
    rx: Receiver<Item>,
}

impl ThreadedSource {
    pub fn spawn<F>(mut inner: F) -> io::Result<Self>
    where
        F: FrameSource + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel::<Item>(QUEUE_DEPTH);
        thread::Builder::new()
            .name("frame-reader".into())
            .spawn(move || loop {
                let item = inner.next_frame();
                let last = !matches!(item, Ok(Some(_)));
                if tx.send(item).is_err() || last {
                    break;
                }
            })?;
        Ok(Self { rx })
    }
}

impl FrameSource for ThreadedSource {
    fn next_frame(&mut self) -> Result<Option<FramePacket>, SourceError> {
        match self.rx.recv() {
            Ok(item) => item,
            Err(_) => Ok(None),
        }
    }

    fn poll_frame(&mut self, timeout: Duration) -> Result<Polled, SourceError> {
        match self.rx.recv_timeout(timeout) {
            Ok(Ok(Some(packet))) => Ok(Polled::Frame(packet)),
            Ok(Ok(None)) | Err(RecvTimeoutError::Disconnected) => Ok(Polled::Closed),
            Ok(Err(e)) => Err(e),
            Err(RecvTimeoutError::Timeout) => Ok(Polled::Idle),
        }
    }
}

// ── Test helpers ───────────────────────────────────────────

/// One JSON line carrying the given hands.
#[cfg(test)]
pub(crate) fn frame_line(hands: &[&[Landmark]]) -> String {
    let hands: Vec<String> = hands
        .iter()
        .map(|hand| {
            let points: Vec<String> = hand
                .iter()
                .map(|l| format!(r#"{{"x":{},"y":{},"z":{}}}"#, l.x, l.y, l.z))
                .collect();
            format!("[{}]", points.join(","))
        })
        .collect();
    format!(r#"{{"hands":[{}]}}"#, hands.join(","))
}

/// A reader whose first read never returns, like a tracker that went quiet.
#[cfg(test)]
pub(crate) struct StalledReader;

#[cfg(test)]
impl io::Read for StalledReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        loop {
            thread::park();
        }
    }
}
