//! kops-mfa - inspect and fill the MFA session credential cache
//!
//! Exit status is 0 on success, 1 when no valid credentials are cached, and
//! 2 when the cache cannot be used.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use kops_mfa::cli::{Cli, Outcome};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::from(2);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    match cli.run(stdin.lock(), &mut stdout) {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::Miss) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

/// Installs a stderr log subscriber; `RUST_LOG` takes precedence over `-v`
fn init_logging(verbose: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let default_level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::default().add_directive(default_level.into()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init()
}
