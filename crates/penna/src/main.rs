// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Penna - a terminal client for the personalized writing assistant.
//!
//! This is the binary entry point for the Penna client.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod shell;
mod status;

/// Penna - write in your own voice, with help.
#[derive(Parser, Debug)]
#[command(name = "penna", version, about, long_about = None)]
struct Cli {
    /// Path to an explicit config file (bypasses the XDG hierarchy).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch the interactive shell (default).
    Shell,
    /// Probe the service and the cached session.
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => penna_config::load_and_validate_path(path),
        None => penna_config::load_and_validate(),
    };
    let config = match config {
        Ok(config) => config,
        Err(errors) => {
            penna_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.shell.log_level);

    let result = match cli.command {
        Some(Commands::Status) => status::run_status(config).await,
        Some(Commands::Shell) | None => shell::run_shell(config).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("penna={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        super::Cli::command().debug_assert();
    }

    #[test]
    fn default_config_loads() {
        let config = penna_config::load_and_validate_str("").expect("defaults should be valid");
        assert_eq!(config.generation.default_context, "general");
    }
}
