//! Location of the credential cache
//!
//! The cache root is resolved once and handed to [`CredentialCache`] instead
//! of being read from the environment on every operation.
//!
//! [`CredentialCache`]: super::CredentialCache

use directories::BaseDirs;
use std::path::{Path, PathBuf};

use super::CacheError;

/// Subdirectory of the cache root holding one token file per profile
pub const CACHE_SUBDIR: &str = "kops";

/// Configuration for where cached credentials live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Base directory; credential files go under `<root>/kops/`
    root: PathBuf,
}

impl CacheConfig {
    /// Uses `$HOME/.cache` as the cache root
    ///
    /// The home-relative path is used on every platform so that tools sharing
    /// the cache agree on its location.
    pub fn from_home() -> Result<Self, CacheError> {
        let dirs = BaseDirs::new().ok_or(CacheError::NoHomeDirectory)?;
        Ok(Self::with_root(dirs.home_dir().join(".cache")))
    }

    /// Uses a custom cache root
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The configured cache root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the per-profile credential files
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(CACHE_SUBDIR)
    }
}
