// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! stdio transport wiring.

use rmcp::{ServiceExt, transport::stdio};
use tokio_util::sync::CancellationToken;
use tracing::info;
use warden_core::WardenError;

use crate::handler::WardenMcpServer;

/// Serves MCP over stdin/stdout until the client disconnects or `shutdown`
/// is cancelled.
///
/// stdout belongs to the protocol; logging must go to stderr.
pub async fn serve_stdio(
    server: WardenMcpServer,
    shutdown: CancellationToken,
) -> Result<(), WardenError> {
    info!("MCP server listening on stdio");

    let running = server
        .serve_with_ct(stdio(), shutdown.child_token())
        .await
        .map_err(|e| WardenError::Server(format!("MCP initialization failed: {e}")))?;

    let reason = running
        .waiting()
        .await
        .map_err(|e| WardenError::Server(format!("MCP service task failed: {e}")))?;

    info!(?reason, "MCP session ended");
    Ok(())
}
