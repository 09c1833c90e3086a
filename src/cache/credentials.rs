//! Temporary session credentials obtained through an MFA challenge

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Environment variable read by cloud SDKs for the access key id
pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable read by cloud SDKs for the secret access key
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
/// Environment variable read by cloud SDKs for the session token
pub const ENV_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// One MFA-derived session: a credential triple plus its expiry
///
/// Serialized with the field names of the on-disk cache format. All four
/// fields are required when parsing; a file missing any of them does not
/// deserialize. The secret and session token are left out of `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryCredentials {
    /// Bearer token for calls made with the temporary credentials
    #[serde(rename = "SessionToken")]
    pub session_token: String,
    /// Access key id of the temporary credential pair
    #[serde(rename = "AccessKeyID")]
    pub access_key_id: String,
    /// Secret half of the temporary credential pair
    #[serde(rename = "SecretAccessKey")]
    pub secret_access_key: String,
    /// When the credentials stop being usable
    #[serde(rename = "ExpiresAt")]
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for TemporaryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl TemporaryCredentials {
    /// Creates a new set of temporary credentials
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_token: session_token.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            expires_at,
        }
    }

    /// Returns true if the credentials are still usable at `now`
    ///
    /// Credentials expiring exactly at `now` are already unusable.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Time left before expiry, or `None` once expired
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.is_valid_at(now).then(|| self.expires_at - now)
    }

    /// The SDK environment variables that carry these credentials
    pub fn env_vars(&self) -> [(&'static str, &str); 3] {
        [
            (ENV_ACCESS_KEY_ID, self.access_key_id.as_str()),
            (ENV_SECRET_ACCESS_KEY, self.secret_access_key.as_str()),
            (ENV_SESSION_TOKEN, self.session_token.as_str()),
        ]
    }
}
