//! Error types for hostfacts-inventory

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from resolving the instance identity file
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The directory holding the identity file could not be created
    #[error("can't create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The identity file exists but could not be read
    #[error("failed to read identity file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A new identity could not be written
    #[error("failed to write identity file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors that can occur while collecting host facts
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Instance identity could not be resolved
    #[error("can't get instance id: {0}")]
    Identity(#[from] IdentityError),

    /// A host-info field is not available
    #[error("host info unavailable: {0}")]
    HostInfo(String),
}
