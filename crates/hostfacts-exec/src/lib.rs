//! hostfacts-exec: Local command execution
//!
//! Runs a single external command with a bounded timeout and captures its
//! output. Commands are never retried.

pub mod error;
pub mod local;
pub mod result;
pub mod traits;

pub use error::ExecError;
pub use local::LocalRunner;
pub use result::CommandResult;
pub use traits::CommandRunner;
