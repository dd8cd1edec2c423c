// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Crewdesk - a customer-support chat backend.
//!
//! This is the binary entry point for the Crewdesk server.

use clap::{Parser, Subcommand};

mod seed;
mod serve;

/// Crewdesk - a customer-support chat backend.
#[derive(Parser, Debug)]
#[command(name = "crewdesk", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Crewdesk server.
    Serve,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match crewdesk_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            crewdesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("crewdesk serve failed: {e}");
                std::process::exit(1);
            }
        }
        None => {
            println!("crewdesk: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed)
        let config = crewdesk_config::load_and_validate()
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "crewdesk");
        assert_eq!(config.server.port, 3001);
    }
}
