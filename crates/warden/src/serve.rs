// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `warden serve` command implementation.
//!
//! Wires the process runner, password source, session broker and vault
//! operations into the MCP server and serves it on stdio until the client
//! disconnects or a shutdown signal arrives.

use std::sync::Arc;

use tracing::info;
use warden_config::WardenConfig;
use warden_core::{VaultCli, WardenError};
use warden_mcp_server::{WardenMcpServer, serve_stdio};
use warden_ops::{BwCli, VaultOperations};
use warden_session::{BrokerSettings, EnvPasswordSource, SessionBroker};

/// Runs the `warden serve` command.
pub async fn run_serve(config: WardenConfig) -> Result<(), WardenError> {
    init_tracing(&config.server.log_level);

    info!(
        binary = %config.cli.binary,
        ttl_secs = config.session.ttl_secs,
        timeout_secs = config.cli.timeout_secs,
        "starting warden"
    );

    let server = build_server(&config);
    let shutdown = crate::shutdown::install_signal_handler();
    serve_stdio(server, shutdown).await?;

    info!("warden stopped");
    Ok(())
}

/// Builds the server for `config`.
///
/// The master password is not read here; the broker reads it on first unlock.
fn build_server(config: &WardenConfig) -> WardenMcpServer {
    let cli: Arc<dyn VaultCli> = Arc::new(BwCli::from_config(&config.cli));
    let password = Arc::new(EnvPasswordSource::new(
        config.session.master_password_env.clone(),
    ));
    let broker = Arc::new(SessionBroker::new(
        cli.clone(),
        password,
        BrokerSettings::from_config(config),
    ));
    let ops = Arc::new(VaultOperations::new(broker, cli, config.cli.timeout()));
    WardenMcpServer::new(ops, config.server.name.clone())
}

/// Initializes the tracing subscriber on stderr; stdout carries MCP traffic.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warden={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .init();
}
