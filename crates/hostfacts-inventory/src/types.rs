//! Host fact type definitions

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metric key of the operating system fact
pub const OS_KEY: &str = "OS";
/// Metric key of the deployment mode fact
pub const DEPLOYMENT_KEY: &str = "deployment";
/// Metric key of the hardware architecture fact
pub const HARDWARE_ARCH_KEY: &str = "hardware_arch";

/// Facts about the host collected in one scrape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostFactRecord {
    /// When the facts were collected
    pub timestamp: DateTime<Utc>,
    /// Identity file the instance id was read from
    pub source: PathBuf,
    /// Fact name to value
    pub metrics: HashMap<String, String>,
}

impl HostFactRecord {
    /// Look up one fact
    #[must_use]
    pub fn metric(&self, key: &str) -> Option<&str> {
        self.metrics.get(key).map(String::as_str)
    }
}
