//! Credential cache for persisting MFA session credentials to disk
//!
//! Provides a `CredentialCache` that stores one JSON file per profile and
//! hands the credentials back only while they are unexpired, so callers can
//! skip the MFA challenge on repeated invocations.

use chrono::{DateTime, Utc};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::{CacheConfig, CacheError, TemporaryCredentials};

/// Mode for the cache directory: owner read/write/execute only
const DIR_MODE: u32 = 0o700;
/// Mode for credential files: owner read/write only
const FILE_MODE: u32 = 0o600;

/// Reads and writes cached temporary credentials, one file per profile
///
/// Files live at `<root>/kops/<profile>-token.json`. The profile name is used
/// verbatim in the file name, so callers must pass filesystem-safe names.
///
/// A read either yields usable credentials or nothing: missing, unreadable,
/// corrupt and expired files all look the same to the caller, whose only
/// remedy in each case is to authenticate again. Writes replace the file
/// atomically; there is no locking, so concurrent writers race and the last
/// one wins.
#[derive(Debug, Clone)]
pub struct CredentialCache {
    config: CacheConfig,
}

impl CredentialCache {
    /// Creates a cache rooted at the given configuration
    pub fn new(config: CacheConfig) -> Self {
        Self { config }
    }

    /// Creates a cache rooted at `$HOME/.cache`
    ///
    /// Returns `Err(CacheError::NoHomeDirectory)` if no home directory resolves.
    pub fn from_home() -> Result<Self, CacheError> {
        CacheConfig::from_home().map(Self::new)
    }

    /// Directory holding the per-profile credential files
    pub fn cache_dir(&self) -> PathBuf {
        self.config.cache_dir()
    }

    /// Resolves the cache file for `profile`, creating the cache directory
    ///
    /// A missing directory is created owner-only. An existing one is left
    /// as it is; [`Self::store`] tightens it before writing.
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - `<root>/kops/<profile>-token.json`
    /// * `Err(CacheError)` - If the directory cannot be created or restricted
    pub fn cache_path(&self, profile: &str) -> Result<PathBuf, CacheError> {
        let dir = self.cache_dir();
        ensure_private_dir(&dir)?;
        Ok(dir.join(format!("{}-token.json", profile)))
    }

    /// Returns cached credentials for `profile` if they are still valid
    ///
    /// Returns `None` when there is nothing usable; see [`Self::load_at`].
    pub fn load(&self, profile: &str) -> Option<TemporaryCredentials> {
        self.load_at(profile, Utc::now())
    }

    /// Returns cached credentials for `profile` if they are valid at `now`
    ///
    /// # Returns
    /// * `Some(TemporaryCredentials)` if the file parses and `expires_at` is after `now`
    /// * `None` if the file is missing, unreadable, malformed or expired
    pub fn load_at(&self, profile: &str, now: DateTime<Utc>) -> Option<TemporaryCredentials> {
        let path = match self.cache_path(profile) {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!(profile, error = %e, "credential cache unavailable");
                return None;
            }
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(profile, path = %path.display(), "no cached credentials");
                return None;
            }
            Err(e) => {
                tracing::debug!(profile, path = %path.display(), error = %e, "cache file unreadable");
                return None;
            }
        };

        let creds: TemporaryCredentials = match serde_json::from_str(&content) {
            Ok(creds) => creds,
            Err(e) => {
                tracing::debug!(profile, path = %path.display(), error = %e, "cache file malformed");
                return None;
            }
        };

        if !creds.is_valid_at(now) {
            tracing::debug!(profile, expires_at = %creds.expires_at, "cached credentials expired");
            return None;
        }

        tracing::debug!(profile, expires_at = %creds.expires_at, "using cached credentials");
        Some(creds)
    }

    /// Writes credentials for `profile`, replacing any previous entry
    ///
    /// The JSON is written to a temporary file in the cache directory, synced,
    /// and renamed over the target, so readers never observe a partial file.
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(CacheError)` if the path cannot be resolved or the file cannot be written
    pub fn store(&self, profile: &str, credentials: &TemporaryCredentials) -> Result<(), CacheError> {
        let path = self.cache_path(profile)?;
        let dir = self.cache_dir();
        restrict_permissions(&dir, DIR_MODE)?;
        let json = serde_json::to_string_pretty(credentials)?;

        let mut file = NamedTempFile::new_in(&dir).map_err(write_error(&path))?;
        restrict_permissions(file.path(), FILE_MODE)?;
        writeln!(file, "{}", json).map_err(write_error(&path))?;
        file.as_file().sync_all().map_err(write_error(&path))?;
        file.persist(&path).map_err(|e| write_error(&path)(e.error))?;

        tracing::info!(profile, expires_at = %credentials.expires_at, "cached temporary credentials");
        Ok(())
    }

    /// Returns cached credentials, or authenticates and caches the result
    ///
    /// `authenticate` runs only on a cache miss. Its credentials are stored
    /// before being returned; a failure to store them is propagated.
    pub fn load_or_else<F, E>(&self, profile: &str, authenticate: F) -> Result<TemporaryCredentials, E>
    where
        F: FnOnce() -> Result<TemporaryCredentials, E>,
        E: From<CacheError>,
    {
        if let Some(creds) = self.load(profile) {
            return Ok(creds);
        }

        tracing::debug!(profile, "credential cache miss, authenticating");
        let creds = authenticate()?;
        self.store(profile, &creds)?;
        Ok(creds)
    }

    /// Runs [`Self::load`] on the blocking thread pool
    pub async fn load_async(&self, profile: &str) -> Option<TemporaryCredentials> {
        let cache = self.clone();
        let profile = profile.to_owned();

        match tokio::task::spawn_blocking(move || cache.load(&profile)).await {
            Ok(creds) => creds,
            Err(e) => {
                tracing::warn!(error = %e, "credential cache read task failed");
                None
            }
        }
    }

    /// Runs [`Self::store`] on the blocking thread pool
    pub async fn store_async(
        &self,
        profile: &str,
        credentials: TemporaryCredentials,
    ) -> Result<(), CacheError> {
        let cache = self.clone();
        let profile = profile.to_owned();

        tokio::task::spawn_blocking(move || cache.store(&profile, &credentials))
            .await
            .map_err(|e| CacheError::Background(e.to_string()))?
    }
}

fn write_error(path: &Path) -> impl Fn(io::Error) -> CacheError + '_ {
    move |source| CacheError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Creates `dir` (and parents) owner-only if it does not exist yet
fn ensure_private_dir(dir: &Path) -> Result<(), CacheError> {
    if dir.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }

    builder.create(dir).map_err(|source| CacheError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    restrict_permissions(dir, DIR_MODE)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) -> Result<(), CacheError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|source| {
        CacheError::Permissions {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) -> Result<(), CacheError> {
    Ok(())
}
