//! hostfacts-inventory: Host identity and host facts
//!
//! Resolves the persisted instance identifier and assembles it with OS,
//! deployment and hardware facts into a single record.

pub mod error;
pub mod host;
pub mod host_info;
pub mod identity;
pub mod types;

pub use error::{IdentityError, InventoryError};
pub use host::HostMetricsScraper;
pub use host_info::{HostInfo, SystemHostInfo};
pub use identity::{DEFAULT_IDENTITY_FILE, INSTANCE_ID_KEY, get_instance_id};
pub use types::HostFactRecord;
