//! Errors surfaced by the credential cache

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving or writing the credential cache
///
/// Reads never produce these: every way a read can fail is reported as a
/// cache miss instead.
#[derive(Debug, Error)]
pub enum CacheError {
    /// No home directory could be resolved for the default cache root
    #[error("Could not determine home directory for the credential cache")]
    NoHomeDirectory,

    /// The cache directory could not be created
    #[error("Failed to create cache directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Owner-only permissions could not be applied
    #[error("Failed to restrict permissions on {}: {source}", path.display())]
    Permissions {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cache file could not be created or written
    #[error("Failed to write cache file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Credentials could not be encoded as JSON
    #[error("Failed to serialize credentials: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A blocking cache task did not complete
    #[error("Background cache task failed: {0}")]
    Background(String),
}
