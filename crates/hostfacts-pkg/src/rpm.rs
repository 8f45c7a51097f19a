//! rpm output parsing (RHEL/CentOS/Rocky/Amazon)

use hostfacts_exec::ExecError;
use tracing::{debug, warn};

use crate::error::PackageError;
use crate::query::PackageQuery;
use crate::scan::{OutputScanner, three_fields};
use crate::types::{Package, QueryOutcome};

/// Printed by rpm when the requested package is absent
const NOT_FOUND_MARKER: &str = "is not installed";
/// Output line: `'<package> <version> <release>'`
const QUERY_FORMAT: &str = "'%{NAME} %{VERSION} %{RELEASE}'";

/// rpm invocation for a single package
pub const QUERY: PackageQuery = PackageQuery::new("rpm", query_args, parse_rpm_output);

fn query_args(package_name: &str) -> Vec<String> {
    vec![
        "-q".to_string(),
        package_name.to_string(),
        "--queryformat".to_string(),
        QUERY_FORMAT.to_string(),
    ]
}

/// Parse rpm output for `package_name`
///
/// Example of an installed package line:
/// `'percona-xtrabackup-81 8.1.0 1.1.el8'`
#[must_use]
pub fn parse_rpm_output(
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
                warn!(error = %e, "failed to read output from rpm");
                return QueryOutcome::Failed(e);
            }
        };

        let Some([name, version, release]) = three_fields(line) else {
            continue;
        };
        if name != package_name {
            continue;
        }

        return QueryOutcome::Found(Package::new(package_name, join_version(version, release)));
    }

    QueryOutcome::NotFound
}

/// `8.1.0` + `1.1.el8` -> `8.1.0-1-1`
fn join_version(version: &str, release: &str) -> String {
    let release = release.rfind('.').map_or(release, |pos| &release[..pos]);
    format!("{version}-{}", release.replace('.', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version_of(outcome: QueryOutcome) -> Option<String> {
        outcome.into_package().map(|p| p.version)
    }

    #[test]
    fn test_parse_installed() {
        assert_eq!(
            parse_rpm_output("pkgA", "pkgA 8.1.0 1.1.el8", None),
            QueryOutcome::Found(Package::new("pkgA", "8.1.0-1-1"))
        );
    }

    #[test]
    fn test_parse_quoted_output() {
        let output = "'percona-server-server 8.0.35 27.1.el9'";
        assert_eq!(
            version_of(parse_rpm_output("percona-server-server", output, None)).as_deref(),
            Some("8.0.35-27-1")
        );
    }

    #[test]
    fn test_parse_release_without_dot() {
        let output = "'etcd 3.5.9 1'";
        assert_eq!(
            version_of(parse_rpm_output("etcd", output, None)).as_deref(),
            Some("3.5.9-1")
        );
    }

    #[test]
    fn test_parse_no_status_gate_first_line_wins() {
        let output = "other 1.0 1.el8\npkgA 2.0 3.el8\npkgA 4.0 5.el8";
        assert_eq!(
            version_of(parse_rpm_output("pkgA", output, None)).as_deref(),
            Some("2.0-3")
        );
    }

    #[test]
    fn test_parse_not_installed_error() {
        let err = ExecError::CommandFailed {
            status: 1,
            stderr: String::new(),
        };
        assert_eq!(
            parse_rpm_output("pkgA", "package pkgA is not installed\n", Some(&err)),
            QueryOutcome::NotFound
        );
    }

    #[test]
    fn test_parse_other_error_is_failure() {
        let err = ExecError::SpawnError("rpm: No such file or directory".to_string());
        assert_eq!(
            parse_rpm_output("pkgA", "", Some(&err)),
            QueryOutcome::Failed(PackageError::Execution(err))
        );
    }

    #[test]
    fn test_parse_no_matching_line() {
        assert_eq!(
            parse_rpm_output("pkgA", "pkgB 1.0 1.el8\nmalformed line", None),
            QueryOutcome::NotFound
        );
    }

    #[test]
    fn test_query_args() {
        assert_eq!(
            QUERY.args("pkgA"),
            vec!["-q", "pkgA", "--queryformat", "'%{NAME} %{VERSION} %{RELEASE}'"]
        );
    }
}
