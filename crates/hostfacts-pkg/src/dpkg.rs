//! dpkg-query output parsing (Debian/Ubuntu)

use hostfacts_exec::ExecError;
use tracing::{debug, warn};

use crate::error::PackageError;
use crate::query::PackageQuery;
use crate::scan::{OutputScanner, three_fields};
use crate::types::{Package, QueryOutcome};

/// Printed by dpkg-query when nothing matches the requested name
const NOT_FOUND_MARKER: &str = "no packages found matching";
/// `db:Status-Abbrev` of a fully installed package
const INSTALLED_STATUS: &str = "ii";
/// Output line: `'<package> <status> [epoch:]<version>'`
const QUERY_FORMAT: &str = "'${Package} ${db:Status-Abbrev}${Version}'";

/// dpkg-query invocation for a single package
pub const QUERY: PackageQuery = PackageQuery::new("dpkg-query", query_args, parse_dpkg_output);

fn query_args(package_name: &str) -> Vec<String> {
    vec![
        "-f".to_string(),
        QUERY_FORMAT.to_string(),
        "-W".to_string(),
        package_name.to_string(),
    ]
}

/// Parse dpkg-query output for `package_name`
///
/// Example of an installed package line:
/// `'percona-xtrabackup-81 ii 2:8.1.0-1-1.jammy'`
#[must_use]
pub fn parse_dpkg_output(
    package_name: &str,
    output: &str,
    exit_error: Option<&ExecError>,
) -> QueryOutcome {
    if let Some(err) = exit_error {
        if output.contains(NOT_FOUND_MARKER) {
            return QueryOutcome::NotFound;
        }
        debug!(output = %output, "cmd output");
        return QueryOutcome::Failed(PackageError::Execution(err.clone()));
    }

    for line in OutputScanner::new(output) {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "failed to read output from dpkg-query");
                return QueryOutcome::Failed(e);
            }
        };

        let Some([name, status, version]) = three_fields(line) else {
            continue;
        };
        if name != package_name || status != INSTALLED_STATUS {
            continue;
        }

        let version = normalize_version(version);
        if version.is_empty() {
            return QueryOutcome::NotFound;
        }
        return QueryOutcome::Found(Package::new(package_name, version));
    }

    QueryOutcome::NotFound
}

/// Drop the distro release suffix, the epoch and any `+dfsg` repack marker
fn normalize_version(raw: &str) -> &str {
    let mut version = raw;
    if let Some(pos) = version.rfind('.') {
        version = &version[..pos];
    }
    if let Some(pos) = version.find(':') {
        version = &version[pos + 1..];
    }
    if let Some(pos) = version.find("+dfsg") {
        version = &version[..pos];
    }
    version
}
