//! Pass-through construction of cloud SDK sessions
//!
//! Session creation belongs to the SDK. This module only names the seam so
//! callers can construct a session through whichever SDK they link, with the
//! configuration forwarded and the result returned untouched.

use std::env;

/// Environment toggle that makes the SDK load the shared config file as well
/// as the shared credentials file
pub const SHARED_CONFIG_ENV: &str = "AWS_SDK_LOAD_CONFIG";

/// Something that can create an SDK session from configuration values
pub trait SessionProvider {
    /// Configuration value accepted by the SDK's session constructor
    type Config;
    /// Session object produced by the SDK
    type Session;
    /// Error produced by the SDK
    type Error;

    /// Creates a session from the given configuration values
    fn create_session(&self, configs: &[Self::Config]) -> Result<Self::Session, Self::Error>;
}

/// Creates a session by delegating to `provider`
///
/// The configuration is forwarded as-is and the provider's result is returned
/// unchanged.
pub fn new_session<P: SessionProvider>(
    provider: &P,
    configs: &[P::Config],
) -> Result<P::Session, P::Error> {
    provider.create_session(configs)
}

/// Whether the shared-config toggle is set to a truthy value
///
/// The SDK interprets the variable itself; this is for callers that want to
/// report which files a session will read. Only the spellings the SDK accepts
/// as true count; anything else, including `yes`, leaves it disabled.
pub fn shared_config_enabled() -> bool {
    env::var(SHARED_CONFIG_ENV)
        .map(|value| is_truthy(&value))
        .unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "1" | "t" | "T" | "true" | "TRUE" | "True")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingProvider {
        seen: RefCell<Vec<String>>,
        fail: bool,
    }

    impl SessionProvider for RecordingProvider {
        type Config = String;
        type Session = usize;
        type Error = String;

        fn create_session(&self, configs: &[String]) -> Result<usize, String> {
            self.seen.borrow_mut().extend(configs.iter().cloned());
            if self.fail {
                Err("no region configured".to_string())
            } else {
                Ok(configs.len())
            }
        }
    }

    #[test]
    fn test_new_session_forwards_configs() {
        let provider = RecordingProvider::default();
        let configs = vec!["region=us-east-1".to_string(), "profile=dev".to_string()];

        let session = new_session(&provider, &configs);

        assert_eq!(session, Ok(2));
        assert_eq!(*provider.seen.borrow(), configs);
    }

    #[test]
    fn test_new_session_propagates_error_unchanged() {
        let provider = RecordingProvider {
            fail: true,
            ..Default::default()
        };

        let result = new_session(&provider, &[]);

        assert_eq!(result, Err("no region configured".to_string()));
    }

    #[test]
    fn test_is_truthy_accepts_sdk_true_spellings() {
        for value in ["1", "t", "T", "true", "TRUE", "True"] {
            assert!(is_truthy(value), "{:?} should enable shared config", value);
        }
    }

    #[test]
    fn test_is_truthy_rejects_everything_else() {
        for value in ["", "0", "f", "F", "false", "no", "off", "yes", "on", " true"] {
            assert!(!is_truthy(value), "{:?} should not enable shared config", value);
        }
    }
}
