//! Local command execution using `tokio::process`

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::error::ExecError;
use crate::result::CommandResult;
use crate::traits::CommandRunner;

/// Default bound for a single command
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Local command runner
///
/// Executes programs directly (no shell) on the local machine. The child is
/// spawned with `kill_on_drop`, so abandoning the wait on timeout or
/// cancellation also kills the process.
#[derive(Debug, Clone)]
pub struct LocalRunner;

impl LocalRunner {
    /// Create a new local runner
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Internal method to execute command
    async fn execute(&self, program: &str, args: &[String]) -> Result<CommandResult, ExecError> {
        let start = Instant::now();

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecError::SpawnError(format!("{program}: {e}")))?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))?;

        let duration = start.elapsed();

        let status = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        debug!(
            program = %program,
            status = status,
            duration = ?duration,
            "command completed"
        );

        Ok(CommandResult {
            status,
            stdout,
            stderr,
            duration,
        })
    }
}

impl Default for LocalRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for LocalRunner {
    #[instrument(skip(self, cancel), level = "debug")]
    async fn run(
        &self,
        program: &str,
        args: &[String],
        timeout_duration: Duration,
        cancel: &CancellationToken,
    ) -> Result<CommandResult, ExecError> {
        let start = Instant::now();

        debug!(cmd = %format!("{program} {}", args.join(" ")), timeout = ?timeout_duration, "executing command");

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                warn!(program = %program, elapsed = ?start.elapsed(), "command cancelled");
                Err(ExecError::Cancelled)
            }
            result = timeout(timeout_duration, self.execute(program, args)) => match result {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(
                        program = %program,
                        timeout = ?timeout_duration,
                        elapsed = ?start.elapsed(),
                        "command timed out"
                    );
                    Err(ExecError::Timeout {
                        timeout: timeout_duration,
                    })
                }
            },
        }
    }
}
