//! Command runner trait

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ExecError;
use crate::result::CommandResult;

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` once, killing it if `timeout` elapses or
    /// `cancel` fires first.
    async fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<CommandResult, ExecError>;
}
