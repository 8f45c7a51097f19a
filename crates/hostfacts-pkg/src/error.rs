//! Error types for hostfacts-pkg

use hostfacts_exec::ExecError;
use thiserror::Error;

/// Errors that can occur while probing a single package
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackageError {
    /// The query command could not be run or exited unsuccessfully
    #[error("execution error: {0}")]
    Execution(#[from] ExecError),

    /// The query output could not be read line by line
    #[error("failed to read command output: {0}")]
    OutputRead(String),
}
