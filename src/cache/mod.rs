//! Cache module for MFA session credentials
//!
//! This module persists temporary credentials to one owner-only JSON file per
//! profile and returns them only while they are unexpired. Anything that
//! makes a cached entry unusable is reported as a plain miss, which tells the
//! caller to run the MFA flow again and store the new credentials.

mod config;
mod credentials;
mod error;
mod manager;

pub use config::{CacheConfig, CACHE_SUBDIR};
pub use credentials::{
    TemporaryCredentials, ENV_ACCESS_KEY_ID, ENV_SECRET_ACCESS_KEY, ENV_SESSION_TOKEN,
};
pub use error::CacheError;
pub use manager::CredentialCache;
