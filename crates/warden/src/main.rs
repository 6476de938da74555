// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! warden - an MCP server for Bitwarden and Vaultwarden vaults.
//!
//! This is the binary entry point. It loads configuration, sets up logging
//! on stderr and dispatches to a subcommand.

mod doctor;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use warden_config::WardenConfig;

/// warden - an MCP server for Bitwarden and Vaultwarden vaults.
#[derive(Parser, Debug)]
#[command(name = "warden", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the vault tools over MCP on stdio (the default).
    Serve,
    /// Check configuration and the bw CLI.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // BW_MASTER_PASSWORD and WARDEN_* overrides may come from a .env file.
    dotenvy::dotenv().ok();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            warden_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Doctor { plain } => doctor::run_doctor(&config, plain).await,
        Commands::Config => print_config(&config),
    };

    if let Err(e) = result {
        eprintln!("warden: {e}");
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<WardenConfig, Vec<warden_config::ConfigError>> {
    match path {
        Some(path) => warden_config::load_and_validate_path(path),
        None => warden_config::load_and_validate(),
    }
}

fn print_config(config: &WardenConfig) -> Result<(), warden_core::WardenError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| warden_core::WardenError::Configuration(e.to_string()))?;
    print!("{rendered}");
    Ok(())
}
