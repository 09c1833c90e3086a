//! kops MFA credential cache library
//!
//! Caches temporary, MFA-derived cloud session credentials per profile so a
//! CLI only prompts for an MFA code when the cached session has expired.

pub mod cache;
pub mod cli;
pub mod session;

pub use cache::{CacheConfig, CacheError, CredentialCache, TemporaryCredentials};
