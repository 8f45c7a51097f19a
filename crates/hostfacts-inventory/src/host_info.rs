//! Host information sources

use sysinfo::System;

use crate::error::InventoryError;

/// Deployment mode reported for package installs
pub const DEFAULT_DEPLOYMENT: &str = "PACKAGE";

/// Supplies OS, deployment and hardware facts; each field fails on its own
pub trait HostInfo: Send + Sync {
    /// OS name and version, e.g. `"Ubuntu 22.04"`
    fn os(&self) -> Result<String, InventoryError>;
    /// How the agent was deployed
    fn deployment(&self) -> Result<String, InventoryError>;
    /// Hardware platform, e.g. `"x86_64"`
    fn hardware_arch(&self) -> Result<String, InventoryError>;
}

/// Host information read from the running system via `sysinfo`
#[derive(Debug, Clone)]
pub struct SystemHostInfo {
    deployment: String,
}

impl SystemHostInfo {
    /// Create a new system host info source
    pub fn new(deployment: impl Into<String>) -> Self {
        Self {
            deployment: deployment.into(),
        }
    }
}

impl Default for SystemHostInfo {
    fn default() -> Self {
        Self::new(DEFAULT_DEPLOYMENT)
    }
}

impl HostInfo for SystemHostInfo {
    fn os(&self) -> Result<String, InventoryError> {
        let name = System::name()
            .ok_or_else(|| InventoryError::HostInfo("OS name not available".to_string()))?;
        // fall back to the kernel release when the distro has no version
        match System::os_version().or_else(System::kernel_version) {
            Some(version) => Ok(format!("{name} {version}")),
            None => Ok(name),
        }
    }

    fn deployment(&self) -> Result<String, InventoryError> {
        if self.deployment.trim().is_empty() {
            return Err(InventoryError::HostInfo(
                "deployment mode not configured".to_string(),
            ));
        }
        Ok(self.deployment.clone())
    }

    fn hardware_arch(&self) -> Result<String, InventoryError> {
        System::cpu_arch()
            .filter(|arch| !arch.is_empty())
            .ok_or_else(|| InventoryError::HostInfo("CPU architecture not available".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment() {
        assert_eq!(SystemHostInfo::default().deployment().unwrap(), "PACKAGE");
        assert_eq!(SystemHostInfo::new("DOCKER").deployment().unwrap(), "DOCKER");
        assert!(SystemHostInfo::new(" ").deployment().is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_reads_running_system() {
        let info = SystemHostInfo::default();
        assert!(!info.hardware_arch().unwrap().is_empty());
        if let Ok(os) = info.os() {
            assert!(!os.trim().is_empty());
        }
    }
}
