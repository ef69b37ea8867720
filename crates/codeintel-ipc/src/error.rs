use crate::command::Command;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced by [`crate::IpcClient`].
pub enum IpcError {
    #[error("unknown command '{0}', valid commands are {valid}", valid = Command::names())]
    /// The command name is not one the worker understands.
    UnknownCommand(String),

    #[error("file '{0}' is not registered with the worker")]
    /// The file was never added (or was already removed).
    UnknownFile(String),

    #[error("all {0} message ids are in flight")]
    /// Every id in `[1, id_max]` is waiting for a response.
    IdsExhausted(u64),

    #[error("worker I/O error: {0}")]
    /// Spawning, writing to or reading from the worker failed.
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
/// Errors produced when applying a line diff.
pub enum DiffError {
    #[error("malformed diff entry on line {0}")]
    /// A diff line did not start with a known prefix.
    MalformedLine(usize),

    #[error("diff line {0} does not match the text being patched")]
    /// A context or removal line disagrees with the text being patched.
    ContextMismatch(usize),

    #[error("diff does not cover the whole text being patched")]
    /// Lines of the original text were left unconsumed.
    UnconsumedText,
}
