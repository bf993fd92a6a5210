//! Command-processing worker.
//!
//! The worker stays resident so the expensive model load is paid once, not
//! per request. It is strictly sequential: one command is received,
//! dispatched, and answered before the next is read. Per-command failures
//! are folded into error responses; only an explicit exit command or channel
//! closure ends the process.
//!
//! - **[`protocol`]**: command normalization and response shapes.
//! - **[`channel`]**: the message-channel interface and the stdio JSON-lines
//!   transport.
//! - **[`cache`]**: the single-active-model lifecycle cache.
//! - **[`dispatch`]**: routing from normalized commands to operations.
//! - **[`core`]**: the receive/dispatch/respond loop.

pub mod cache;
pub mod channel;
pub mod core;
pub mod dispatch;
pub mod protocol;

// Re-export key types for convenience
pub use cache::{CacheInfo, LoadStatus, ModelCache};
pub use channel::{Channel, RecvError, SendError, StdioChannel};
pub use core::Worker;
pub use dispatch::CommandDispatcher;
pub use protocol::{Command, ParsedFrame, Response, parse_frame};
