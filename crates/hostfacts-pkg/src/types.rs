//! Type definitions for package inventory

use serde::{Deserialize, Serialize};

use crate::error::PackageError;

/// An installed package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Package name as it was queried
    pub name: String,
    /// Installed version, normalized
    pub version: String,
}

impl Package {
    /// Create a new package fact
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Outcome of probing one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The package is installed
    Found(Package),
    /// The package is not installed
    NotFound,
    /// The package state could not be determined
    Failed(PackageError),
}

impl QueryOutcome {
    /// Consume the outcome, keeping only a found package
    #[must_use]
    pub fn into_package(self) -> Option<Package> {
        match self {
            QueryOutcome::Found(pkg) => Some(pkg),
            QueryOutcome::NotFound | QueryOutcome::Failed(_) => None,
        }
    }
}
