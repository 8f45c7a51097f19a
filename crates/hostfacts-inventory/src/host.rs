//! Host metrics scraping

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument};

use crate::error::InventoryError;
use crate::host_info::HostInfo;
use crate::identity::{INSTANCE_ID_KEY, get_instance_id};
use crate::types::{DEPLOYMENT_KEY, HARDWARE_ARCH_KEY, HostFactRecord, OS_KEY};

/// Value used for a host fact that could not be determined
pub const UNKNOWN: &str = "unknown";

/// Collects the host fact record
pub struct HostMetricsScraper {
    identity_file: PathBuf,
    host_info: Arc<dyn HostInfo>,
}

impl HostMetricsScraper {
    /// Create a new host metrics scraper
    ///
    /// # Arguments
    /// * `identity_file` - Path of the persisted instance identity
    /// * `host_info` - Source of OS, deployment and architecture facts
    pub fn new(identity_file: impl Into<PathBuf>, host_info: Arc<dyn HostInfo>) -> Self {
        Self {
            identity_file: identity_file.into(),
            host_info,
        }
    }

    /// Resolve the instance id and assemble it with the host facts
    ///
    /// # Errors
    /// Returns an error if the instance identity cannot be read or created.
    /// Host-info failures only degrade their field to `"unknown"`.
    #[instrument(skip(self), fields(file = %self.identity_file.display()))]
    pub fn scrape_host_metrics(&self) -> Result<HostFactRecord, InventoryError> {
        let instance_id = get_instance_id(&self.identity_file)?;

        let mut metrics = HashMap::new();
        metrics.insert(INSTANCE_ID_KEY.to_string(), instance_id);
        metrics.insert(OS_KEY.to_string(), or_unknown(OS_KEY, self.host_info.os()));
        metrics.insert(
            DEPLOYMENT_KEY.to_string(),
            or_unknown(DEPLOYMENT_KEY, self.host_info.deployment()),
        );
        metrics.insert(
            HARDWARE_ARCH_KEY.to_string(),
            or_unknown(HARDWARE_ARCH_KEY, self.host_info.hardware_arch()),
        );

        Ok(HostFactRecord {
            timestamp: Utc::now(),
            source: self.identity_file.clone(),
            metrics,
        })
    }
}

fn or_unknown(field: &str, value: Result<String, InventoryError>) -> String {
    value.unwrap_or_else(|e| {
        debug!(field, error = %e, "host info unavailable");
        UNKNOWN.to_string()
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::error::IdentityError;

    struct FixedHostInfo {
        os: Option<&'static str>,
        arch: Option<&'static str>,
    }

    fn field(value: Option<&'static str>) -> Result<String, InventoryError> {
        value
            .map(ToString::to_string)
            .ok_or_else(|| InventoryError::HostInfo("not available".to_string()))
    }

    impl HostInfo for FixedHostInfo {
        fn os(&self) -> Result<String, InventoryError> {
            field(self.os)
        }

        fn deployment(&self) -> Result<String, InventoryError> {
            Ok("PACKAGE".to_string())
        }

        fn hardware_arch(&self) -> Result<String, InventoryError> {
            field(self.arch)
        }
    }

    #[test]
    fn test_scrape_host_metrics() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("percona/telemetry_uuid");
        let scraper = HostMetricsScraper::new(
            &path,
            Arc::new(FixedHostInfo {
                os: Some("Ubuntu 22.04"),
                arch: Some("x86_64"),
            }),
        );

        let record = scraper.scrape_host_metrics().unwrap();

        assert_eq!(record.source, path);
        assert_eq!(record.metrics.len(), 4);
        assert_eq!(record.metric("OS"), Some("Ubuntu 22.04"));
        assert_eq!(record.metric("deployment"), Some("PACKAGE"));
        assert_eq!(record.metric("hardware_arch"), Some("x86_64"));

        let instance_id = record.metric("instanceId").unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("instanceId: {instance_id}")
        );

        let again = scraper.scrape_host_metrics().unwrap();
        assert_eq!(again.metric("instanceId"), Some(instance_id));
    }

    #[test]
    fn test_host_info_failures_default_to_unknown() {
        let tmp = TempDir::new().unwrap();
        let scraper = HostMetricsScraper::new(
            tmp.path().join("telemetry_uuid"),
            Arc::new(FixedHostInfo { os: None, arch: None }),
        );

        let record = scraper.scrape_host_metrics().unwrap();

        assert_eq!(record.metric("OS"), Some("unknown"));
        assert_eq!(record.metric("hardware_arch"), Some("unknown"));
        assert_eq!(record.metric("deployment"), Some("PACKAGE"));
    }

    #[test]
    fn test_identity_failure_fails_the_scrape() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();
        let scraper = HostMetricsScraper::new(
            blocker.join("telemetry_uuid"),
            Arc::new(FixedHostInfo {
                os: Some("Ubuntu 22.04"),
                arch: Some("x86_64"),
            }),
        );

        let err = scraper.scrape_host_metrics().unwrap_err();

        assert!(matches!(
            err,
            InventoryError::Identity(IdentityError::Read { .. })
        ));
        assert!(err.to_string().starts_with("can't get instance id"));
    }

    #[test]
    fn test_record_serializes_metrics() {
        let tmp = TempDir::new().unwrap();
        let scraper = HostMetricsScraper::new(
            tmp.path().join("telemetry_uuid"),
            Arc::new(FixedHostInfo {
                os: Some("Rocky Linux 9.3"),
                arch: Some("aarch64"),
            }),
        );
        let record = scraper.scrape_host_metrics().unwrap();

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["metrics"]["OS"], "Rocky Linux 9.3");
        assert_eq!(json["metrics"]["hardware_arch"], "aarch64");
        let back: HostFactRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
