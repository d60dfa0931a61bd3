// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Porter - a Telegram gatekeeper bot with owner-approved onboarding.
//!
//! This is the binary entry point for the Porter bot.

mod commands;
mod serve;
mod shutdown;

use clap::{Parser, Subcommand};

/// Porter - a Telegram gatekeeper bot with owner-approved onboarding.
#[derive(Parser, Debug)]
#[command(name = "porter", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Porter bot.
    Serve,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match porter_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            porter_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("porter serve failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            match toml::to_string_pretty(&config) {
                Ok(rendered) => println!("{rendered}"),
                Err(e) => {
                    eprintln!("failed to render configuration: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("porter: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed)
        let config = porter_config::load_and_validate().expect("default config should be valid");
        assert_eq!(config.agent.name, "porter");
    }
}
