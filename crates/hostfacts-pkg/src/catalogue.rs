//! Catalogue of package names to query

use serde::{Deserialize, Serialize};

use crate::family::PackageFamily;

/// Package names queried during a scrape
///
/// Lists left out of a config file fall back to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageCatalogue {
    /// Names shared by Debian and RHEL packaging
    #[serde(default = "default_common")]
    pub common: Vec<String>,
    /// Debian-only names
    #[serde(default = "default_debian")]
    pub debian: Vec<String>,
    /// RHEL-only names
    #[serde(default = "default_rhel")]
    pub rhel: Vec<String>,
}

impl Default for PackageCatalogue {
    fn default() -> Self {
        Self {
            common: default_common(),
            debian: default_debian(),
            rhel: default_rhel(),
        }
    }
}

impl PackageCatalogue {
    /// Family-specific names
    #[must_use]
    pub fn family_packages(&self, family: PackageFamily) -> &[String] {
        match family {
            PackageFamily::Debian => &self.debian,
            PackageFamily::Rhel => &self.rhel,
            PackageFamily::Unsupported => &[],
        }
    }

    /// Common names followed by the family-specific ones, in order
    #[must_use]
    pub fn candidates(&self, family: PackageFamily) -> Vec<String> {
        let mut names = self.common.clone();
        names.extend_from_slice(self.family_packages(family));
        names
    }
}

fn to_owned(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn default_common() -> Vec<String> {
    to_owned(&[
        // PS + PXC
        "percona-server-server",
        "percona-server-server-pro",
        "percona-mysql-shell",
        "percona-mysql-router",
        "percona-mysql-router-pro",
        "proxysql",
        "proxysql2",
        "percona-orchestrator",
        "percona-xtradb-cluster-server",
        "percona-xtradb-cluster-mysql-router",
        // PSMDB
        "percona-server-mongodb-server",
        "percona-server-mongodb-server-pro",
        "percona-server-mongodb-mongos",
        "percona-server-mongodb-mongos-pro",
        "percona-backup-mongodb",
        // PG
        "etcd",
        "percona-pgbouncer",
        // PXB
        "percona-xtrabackup-24",
        "percona-xtrabackup-80",
        "percona-xtrabackup-81",
        "percona-xtrabackup-82",
        "percona-xtrabackup-83",
        "percona-toolkit",
        "percona-haproxy",
        "pmm2-client",
        "percona-telemetry-agent",
    ])
}

fn default_debian() -> Vec<String> {
    to_owned(&[
        "Percona-Server-server-5.7",
        "Percona-Xtradb-Cluster-server-5.7",
        "percona-postgresql-14",
        "percona-postgresql-15",
        "percona-postgresql-16",
    ])
}

fn default_rhel() -> Vec<String> {
    to_owned(&[
        "Percona-Server-server-57",
        "Percona-XtraDB-Cluster-server-57",
        "percona-postgresql14-server",
        "percona-postgresql15-server",
        "percona-postgresql16-server",
    ])
}
