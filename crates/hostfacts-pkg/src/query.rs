//! Running a family's query command and parsing its output

use std::time::Duration;

use hostfacts_exec::{CommandRunner, ExecError};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::types::QueryOutcome;

/// Parses combined command output for one queried package
pub type OutputParser = fn(&str, &str, Option<&ExecError>) -> QueryOutcome;

/// Query command plus the parser for its output
#[derive(Debug, Clone, Copy)]
pub struct PackageQuery {
    /// Executable to run
    pub program: &'static str,
    args: fn(&str) -> Vec<String>,
    parse: OutputParser,
}

impl PackageQuery {
    pub(crate) const fn new(
        program: &'static str,
        args: fn(&str) -> Vec<String>,
        parse: OutputParser,
    ) -> Self {
        Self {
            program,
            args,
            parse,
        }
    }

    /// Argument vector used to query `package_name`
    #[must_use]
    pub fn args(&self, package_name: &str) -> Vec<String> {
        (self.args)(package_name)
    }

    /// Parse output previously captured for `package_name`
    #[must_use]
    pub fn parse(
        &self,
        package_name: &str,
        output: &str,
        exit_error: Option<&ExecError>,
    ) -> QueryOutcome {
        (self.parse)(package_name, output, exit_error)
    }

    /// Run the query for one package and classify the result
    pub async fn query_package(
        &self,
        runner: &dyn CommandRunner,
        package_name: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> QueryOutcome {
        let args = self.args(package_name);
        debug!(cmd = %format!("{} {}", self.program, args.join(" ")), "executing command");

        match runner.run(self.program, &args, timeout, cancel).await {
            Ok(result) => {
                let exit_error = result.exit_error();
                self.parse(package_name, &result.combined_output(), exit_error.as_ref())
            }
            Err(e) => self.parse(package_name, "", Some(&e)),
        }
    }
}
