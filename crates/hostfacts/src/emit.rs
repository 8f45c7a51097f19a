//! JSON output of collected facts

use std::io::Write;
use std::path::Path;

use eyre::WrapErr;
use hostfacts_inventory::HostFactRecord;
use hostfacts_pkg::Package;
use serde::Serialize;

/// Everything collected in one run
#[derive(Debug, Default, Serialize)]
pub struct Report {
    /// Host facts, when scraped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<HostFactRecord>,
    /// Installed packages, when scraped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages: Option<Vec<Package>>,
}

/// Write the report as pretty JSON to `output`, or stdout when `None`
pub fn write_report(report: &Report, output: Option<&Path>) -> eyre::Result<()> {
    let json = serde_json::to_string_pretty(report).wrap_err("failed to serialize report")?;

    match output {
        Some(path) => std::fs::write(path, format!("{json}\n"))
            .wrap_err_with(|| format!("failed to write report to {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").wrap_err("failed to write report to stdout")
        }
    }
}
