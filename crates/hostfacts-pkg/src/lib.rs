//! hostfacts-pkg: Installed package inventory
//!
//! Detects the host's package-manager family and queries a catalogue of
//! package names with `dpkg-query` or `rpm`, one command per package.

pub mod catalogue;
pub mod dpkg;
pub mod error;
pub mod family;
pub mod query;
pub mod rpm;
mod scan;
pub mod scraper;
pub mod types;

pub use catalogue::PackageCatalogue;
pub use error::PackageError;
pub use family::PackageFamily;
pub use query::PackageQuery;
pub use scraper::PackageScraper;
pub use types::{Package, QueryOutcome};
