//! Package-manager family detection

use crate::dpkg;
use crate::query::PackageQuery;
use crate::rpm;

const DEBIAN_PREFIXES: &[&str] = &["debian", "ubuntu"];
const RHEL_PREFIXES: &[&str] = &["el", "centos", "oracle", "rocky", "red hat", "amazon", "alma"];

/// Package-manager family of a Linux distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageFamily {
    /// Debian-derived, queried with `dpkg-query`
    Debian,
    /// RHEL-derived, queried with `rpm`
    Rhel,
    /// Anything else; no packages are queried
    Unsupported,
}

impl PackageFamily {
    /// Classify an OS identifier such as `"Ubuntu 22.04"` or
    /// `"Rocky Linux 9.3"` by case-insensitive prefix.
    #[must_use]
    pub fn detect(os: &str) -> Self {
        let os = os.to_lowercase();
        let matches = |prefixes: &[&str]| prefixes.iter().any(|p| os.starts_with(p));

        if matches(DEBIAN_PREFIXES) {
            PackageFamily::Debian
        } else if matches(RHEL_PREFIXES) {
            PackageFamily::Rhel
        } else {
            PackageFamily::Unsupported
        }
    }

    /// Query command and parser for this family
    #[must_use]
    pub fn query(self) -> Option<PackageQuery> {
        match self {
            PackageFamily::Debian => Some(dpkg::QUERY),
            PackageFamily::Rhel => Some(rpm::QUERY),
            PackageFamily::Unsupported => None,
        }
    }
}

impl std::fmt::Display for PackageFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageFamily::Debian => write!(f, "debian"),
            PackageFamily::Rhel => write!(f, "rhel"),
            PackageFamily::Unsupported => write!(f, "unsupported"),
        }
    }
}
