//! Installed package scraping

use std::sync::Arc;
use std::time::Duration;

use hostfacts_exec::CommandRunner;
use hostfacts_exec::local::DEFAULT_COMMAND_TIMEOUT;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::catalogue::PackageCatalogue;
use crate::error::PackageError;
use crate::family::PackageFamily;
use crate::types::{Package, QueryOutcome};

/// Scrapes which catalogue packages are installed on the host
///
/// Every package query is best effort: a package that cannot be queried is logged
/// and skipped, and the scrape itself never fails.
pub struct PackageScraper {
    runner: Arc<dyn CommandRunner>,
    catalogue: PackageCatalogue,
    /// OS identifier used to pick the package-manager family
    os: String,
    timeout: Duration,
}

impl PackageScraper {
    /// Create a new package scraper
    ///
    /// # Arguments
    /// * `runner` - Runner for the package query commands
    /// * `catalogue` - Package names to query
    /// * `os` - OS identifier of the host, e.g. `"Ubuntu 22.04"`
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        catalogue: PackageCatalogue,
        os: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            catalogue,
            os: os.into(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Set the per-command timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Detected package-manager family
    #[must_use]
    pub fn family(&self) -> PackageFamily {
        PackageFamily::detect(&self.os)
    }

    /// Query every catalogue package in order and return the installed ones
    ///
    /// Stops early, returning what was found so far, once `cancel` fires.
    #[instrument(skip(self, cancel), fields(os = %self.os))]
    pub async fn scrape_installed_packages(&self, cancel: &CancellationToken) -> Vec<Package> {
        let family = self.family();
        let Some(query) = family.query() else {
            warn!(os = %self.os, "unsupported package system");
            return Vec::new();
        };

        let candidates = self.catalogue.candidates(family);
        debug!(%family, count = candidates.len(), "querying packages");

        let mut installed = Vec::new();
        for name in &candidates {
            if cancel.is_cancelled() {
                warn!("package scrape cancelled");
                break;
            }

            match query
                .query_package(self.runner.as_ref(), name, self.timeout, cancel)
                .await
            {
                QueryOutcome::Found(pkg) => installed.push(pkg),
                QueryOutcome::NotFound => {}
                QueryOutcome::Failed(PackageError::Execution(e))
                    if e.is_aborted() && cancel.is_cancelled() =>
                {
                    warn!(package = %name, "package scrape cancelled");
                    break;
                }
                QueryOutcome::Failed(e) => {
                    warn!(package = %name, error = %e, "failed to get package info");
                }
            }
        }

        info!(
            %family,
            queried = candidates.len(),
            installed = installed.len(),
            "package scrape completed"
        );

        installed
    }
}
