//! Message channel between worker and parent process.
//!
//! The transport is message-oriented JSON: one document per message.
//! [`Channel::receive`] narrows failures to a closed set so the loop can
//! tell routine polling apart from peer departure and from noise frames.

use std::io::{BufRead, Write};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Receive failure kinds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecvError {
    /// No message within the poll bound; routine, not an error condition.
    #[error("receive timed out")]
    TimedOut,
    /// The peer will send no more data.
    #[error("channel closed")]
    Closed,
    /// A frame arrived but did not decode; dropped without a response.
    #[error("malformed frame: {0}")]
    Malformed(String),
}

/// Send failure.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Bidirectional message channel carrying JSON values.
pub trait Channel {
    /// Blocking receive bounded by `timeout`.
    fn receive(&self, timeout: Duration) -> Result<Value, RecvError>;

    /// Enqueue one outbound message; fire-and-forget.
    fn send(&self, message: &Value) -> Result<(), SendError>;
}

/// JSON-lines channel over the process's stdin/stdout.
///
/// A dedicated reader thread turns blocking pipe reads into a bounded queue
/// so the worker thread can poll with a timeout. The thread exits at stdin
/// EOF, which surfaces as [`RecvError::Closed`] once the queue drains.
pub struct StdioChannel {
    frames: Receiver<Result<Value, String>>,
    stdout: Mutex<std::io::Stdout>,
}

impl StdioChannel {
    /// Spawn the reader thread and wire up the channel.
    pub fn spawn() -> std::io::Result<Self> {
        let (tx, rx) = crossbeam_channel::bounded(64);

        std::thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    let Ok(line) = line else { break };
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let frame = serde_json::from_str(line).map_err(|e| e.to_string());
                    if tx.send(frame).is_err() {
                        break;
                    }
                }
                debug!("stdin reader finished");
            })?;

        Ok(Self {
            frames: rx,
            stdout: Mutex::new(std::io::stdout()),
        })
    }
}

impl Channel for StdioChannel {
    fn receive(&self, timeout: Duration) -> Result<Value, RecvError> {
        match self.frames.recv_timeout(timeout) {
            Ok(Ok(frame)) => Ok(frame),
            Ok(Err(decode)) => Err(RecvError::Malformed(decode)),
            Err(RecvTimeoutError::Timeout) => Err(RecvError::TimedOut),
            Err(RecvTimeoutError::Disconnected) => Err(RecvError::Closed),
        }
    }

    fn send(&self, message: &Value) -> Result<(), SendError> {
        let mut out = self.stdout.lock();
        serde_json::to_writer(&mut *out, message)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}
