#![warn(missing_docs)]
//! Client side of the codeintel worker protocol.
//!
//! The worker is a separate process answering completion, highlighting and lookup requests.
//! [`IpcClient`] keeps it running, mirrors the editor's open files into it with line diffs and
//! hands back only the newest response for each [`Command`].

mod client;
mod command;
mod config;
mod diff;
mod error;
mod ids;
mod message;
mod transport;

pub use client::IpcClient;
pub use command::Command;
pub use config::{DEFAULT_ID_MAX, IpcConfig};
pub use diff::{NO_NEWLINE_MARKER, apply_line_diff, line_diff};
pub use error::{DiffError, IpcError};
pub use ids::IdAllocator;
pub use message::{Message, RequestParams, Response};
pub use transport::{ProcessWorker, WorkerChannel, read_line, write_message};
