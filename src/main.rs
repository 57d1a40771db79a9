//! Sigex - a process runner with layered environments and secret injection.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sigex::cli::output;
use sigex::cli::{execute, Cli};
use sigex::error::Error;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("SIGEX_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("sigex=debug")
        } else {
            EnvFilter::new("sigex=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::MissingCommand => Some("usage: sigex [flags] command [args...]"),
            Error::Secret { source, .. } if matches!(**source, Error::UnsupportedPlatform(_)) => {
                Some("supported platforms: gcp, aws, rot13")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
