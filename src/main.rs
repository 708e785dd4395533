//! Binary entry point.
//!
//! Parses the command line, loads the config, initializes tracing and opens
//! the registry, then either runs one subcommand or hands over to the
//! interactive session. Failing to load the config or open the store is the
//! only fatal startup error; it is reported on stderr with a non-zero exit.

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use modstash::cli::{run_command, Cli};
use modstash::observability::init_tracing;
use modstash::{open_registry, start_session};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.global.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("modstash: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config);

    let registry = match open_registry(&config) {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!(error = %e, "failed to open registry");
            eprintln!("modstash: failed to open store: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Some(command) => run_command(&registry, command, &mut std::io::stdout().lock()),
        None => start_session(Arc::new(registry), &config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("modstash: {e}");
            ExitCode::FAILURE
        }
    }
}
