//! Error types for hostfacts-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during command execution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// Command ran but exited unsuccessfully
    #[error("command execution failed: {status} - {stderr}")]
    CommandFailed {
        /// Exit status code (-1 when terminated by a signal)
        status: i32,
        /// Stderr output
        stderr: String,
    },

    /// Command timed out and was killed
    #[error("command timed out after {timeout:?}")]
    Timeout {
        /// Timeout duration that was exceeded
        timeout: Duration,
    },

    /// Caller cancelled the command and it was killed
    #[error("command cancelled")]
    Cancelled,

    /// Process spawn error
    #[error("failed to spawn process: {0}")]
    SpawnError(String),

    /// I/O error while collecting output
    #[error("I/O error: {0}")]
    IoError(String),
}

impl ExecError {
    /// Check if the process never produced an exit status
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        matches!(self, ExecError::Timeout { .. } | ExecError::Cancelled)
    }
}
