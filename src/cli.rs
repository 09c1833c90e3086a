//! Command-line interface for inspecting and filling the credential cache
//!
//! This module handles parsing of CLI arguments using clap and running the
//! selected subcommand against a [`CredentialCache`].

use std::io::{self, Read, Write};
use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::cache::{CacheConfig, CacheError, CredentialCache, TemporaryCredentials};
use crate::session;

/// Error types for running CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    /// The cache could not be resolved or written
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Credentials read from stdin were not in the cache file format
    #[error("Invalid credentials on stdin: {0}")]
    InvalidCredentials(#[source] serde_json::Error),

    /// Reading input or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// kops MFA credential cache
#[derive(Parser, Debug)]
#[command(name = "kops-mfa")]
#[command(about = "Inspect and fill the MFA session credential cache")]
#[command(version)]
pub struct Cli {
    /// Cache root directory (defaults to $HOME/.cache)
    #[arg(long, value_name = "DIR", global = true)]
    pub cache_root: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands operating on one profile's cache entry
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the cache file path for a profile
    Path {
        #[arg(short, long, default_value = "default")]
        profile: String,
    },
    /// Show whether valid credentials are cached for a profile
    Show {
        #[arg(short, long, default_value = "default")]
        profile: String,
    },
    /// Print shell exports for the cached credentials of a profile
    ///
    /// Example:
    ///   eval "$(kops-mfa env --profile prod)"
    Env {
        #[arg(short, long, default_value = "default")]
        profile: String,
    },
    /// Store credentials read as JSON from stdin
    ///
    /// Expects an object with SessionToken, AccessKeyID, SecretAccessKey and
    /// ExpiresAt (RFC 3339).
    Store {
        #[arg(short, long, default_value = "default")]
        profile: String,
    },
}

/// How a command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command did what was asked
    Success,
    /// No valid credentials are cached for the profile
    Miss,
}

impl Cli {
    /// Builds the cache this invocation operates on
    pub fn cache(&self) -> Result<CredentialCache, CacheError> {
        match &self.cache_root {
            Some(root) => Ok(CredentialCache::new(CacheConfig::with_root(root))),
            None => CredentialCache::from_home(),
        }
    }

    /// Runs the selected subcommand
    ///
    /// # Arguments
    /// * `input` - Source of credentials for `store`
    /// * `out` - Where command output is written
    ///
    /// # Returns
    /// * `Ok(Outcome::Miss)` if `show` or `env` found nothing usable
    /// * `Ok(Outcome::Success)` otherwise
    /// * `Err(CliError)` if the cache cannot be used or I/O fails
    pub fn run<R: Read, W: Write>(&self, input: R, out: &mut W) -> Result<Outcome, CliError> {
        let cache = self.cache()?;

        match &self.command {
            Command::Path { profile } => {
                writeln!(out, "{}", cache.cache_path(profile)?.display())?;
                Ok(Outcome::Success)
            }
            Command::Show { profile } => {
                let Some(creds) = cache.load(profile) else {
                    writeln!(out, "No valid cached credentials for profile '{}'", profile)?;
                    return Ok(Outcome::Miss);
                };
                let now = Utc::now();
                let minutes = creds.remaining(now).map_or(0, |d| d.num_minutes());
                writeln!(out, "Profile:       {}", profile)?;
                writeln!(out, "Access key id: {}", creds.access_key_id)?;
                writeln!(out, "Expires at:    {}", creds.expires_at.to_rfc3339())?;
                writeln!(out, "Remaining:     {} min", minutes)?;
                writeln!(
                    out,
                    "Shared config: {}",
                    if session::shared_config_enabled() { "enabled" } else { "disabled" }
                )?;
                Ok(Outcome::Success)
            }
            Command::Env { profile } => {
                let Some(creds) = cache.load(profile) else {
                    return Ok(Outcome::Miss);
                };
                for (name, value) in creds.env_vars() {
                    writeln!(out, "export {}={}", name, shell_quote(value))?;
                }
                Ok(Outcome::Success)
            }
            Command::Store { profile } => {
                let creds = read_credentials(input)?;
                cache.store(profile, &creds)?;
                writeln!(
                    out,
                    "Cached credentials for profile '{}' until {}",
                    profile,
                    creds.expires_at.to_rfc3339()
                )?;
                Ok(Outcome::Success)
            }
        }
    }
}

/// Parses credentials in the cache file format
pub fn read_credentials<R: Read>(mut input: R) -> Result<TemporaryCredentials, CliError> {
    let mut buf = String::new();
    input.read_to_string(&mut buf)?;
    serde_json::from_str(&buf).map_err(CliError::InvalidCredentials)
}

/// Wraps a value in single quotes for POSIX shells
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn cli_in(temp_dir: &TempDir, args: &[&str]) -> Cli {
        let root = temp_dir.path().to_str().unwrap();
        let mut full = vec!["kops-mfa", "--cache-root", root];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    fn run(cli: &Cli, input: &str) -> (Result<Outcome, CliError>, String) {
        let mut out = Vec::new();
        let result = cli.run(input.as_bytes(), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn credentials_json(expires_in: Duration) -> String {
        let creds = TemporaryCredentials::new(
            "ASIACLI",
            "cli-secret",
            "cli-token",
            Utc::now() + expires_in,
        );
        serde_json::to_string(&creds).unwrap()
    }

    #[test]
    fn test_cli_parse_defaults_profile() {
        let cli = Cli::parse_from(["kops-mfa", "show"]);
        assert_eq!(
            cli.command,
            Command::Show {
                profile: "default".to_string()
            }
        );
        assert!(cli.cache_root.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["kops-mfa", "env", "-p", "prod", "-vv", "--cache-root", "/x"]);
        assert_eq!(
            cli.command,
            Command::Env {
                profile: "prod".to_string()
            }
        );
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.cache_root, Some(PathBuf::from("/x")));
    }

    #[test]
    fn test_path_prints_token_file() {
        let temp_dir = TempDir::new().unwrap();
        let (result, out) = run(&cli_in(&temp_dir, &["path", "--profile", "prod"]), "");

        assert_eq!(result.unwrap(), Outcome::Success);
        let expected = temp_dir.path().join("kops").join("prod-token.json");
        assert_eq!(out.trim(), expected.display().to_string());
    }

    #[test]
    fn test_show_reports_miss() {
        let temp_dir = TempDir::new().unwrap();
        let (result, out) = run(&cli_in(&temp_dir, &["show"]), "");

        assert_eq!(result.unwrap(), Outcome::Miss);
        assert!(out.contains("No valid cached credentials"));
    }

    #[test]
    fn test_store_then_show_and_env() {
        let temp_dir = TempDir::new().unwrap();
        let json = credentials_json(Duration::hours(1));

        let (result, _) = run(&cli_in(&temp_dir, &["store", "-p", "dev"]), &json);
        assert_eq!(result.unwrap(), Outcome::Success);

        let (result, out) = run(&cli_in(&temp_dir, &["show", "-p", "dev"]), "");
        assert_eq!(result.unwrap(), Outcome::Success);
        assert!(out.contains("ASIACLI"));
        assert!(!out.contains("cli-secret"), "show must not print secrets");

        let (result, out) = run(&cli_in(&temp_dir, &["env", "-p", "dev"]), "");
        assert_eq!(result.unwrap(), Outcome::Success);
        assert!(out.contains("export AWS_ACCESS_KEY_ID='ASIACLI'"));
        assert!(out.contains("export AWS_SECRET_ACCESS_KEY='cli-secret'"));
        assert!(out.contains("export AWS_SESSION_TOKEN='cli-token'"));
    }

    #[test]
    fn test_env_prints_nothing_for_expired() {
        let temp_dir = TempDir::new().unwrap();
        let json = credentials_json(Duration::seconds(-1));
        run(&cli_in(&temp_dir, &["store"]), &json).0.unwrap();

        let (result, out) = run(&cli_in(&temp_dir, &["env"]), "");

        assert_eq!(result.unwrap(), Outcome::Miss);
        assert!(out.is_empty());
    }

    #[test]
    fn test_store_rejects_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let (result, _) = run(&cli_in(&temp_dir, &["store"]), r#"{"AccessKeyID": "a"}"#);

        assert!(matches!(result, Err(CliError::InvalidCredentials(_))));
    }

    #[test]
    fn test_shell_quote_escapes_single_quotes() {
        assert_eq!(shell_quote("abc"), "'abc'");
        assert_eq!(shell_quote("a'b"), r"'a'\''b'");
    }
}
