// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MCP tool handler for warden.
//!
//! Each tool deserializes its parameters, calls the matching
//! [`VaultOperations`] method and renders the outcome as a single text
//! content block: pretty-printed JSON on success, `ERROR: <message>` with
//! `isError: true` on failure. Operation errors are tool results, not
//! protocol errors, so the client model can read and react to them.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use tracing::{debug, warn};
use warden_core::WardenError;
use warden_ops::{
    CreateSecretParams, DeleteSecretParams, GetSecretParams, ListSecretsParams, TemplateParams,
    UpdateSecretParams, VaultOperations,
};

const INSTRUCTIONS: &str = "Access a Bitwarden or Vaultwarden vault through the bw CLI. \
The vault is unlocked automatically. Use get_secret_template before create_secret \
to get the expected item JSON for a type.";

/// MCP server exposing the vault operations as tools.
#[derive(Clone)]
pub struct WardenMcpServer {
    ops: Arc<VaultOperations>,
    name: String,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WardenMcpServer {
    pub fn new(ops: Arc<VaultOperations>, name: impl Into<String>) -> Self {
        Self {
            ops,
            name: name.into(),
            tool_router: Self::tool_router(),
        }
    }

    /// Names of every registered tool.
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect()
    }

    #[tool(description = "Get the details of a secret by its name or ID. The vault is unlocked automatically.")]
    pub async fn get_secret(
        &self,
        Parameters(params): Parameters<GetSecretParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(render("get_secret", self.ops.get_secret(params).await))
    }

    #[tool(description = "Search for secrets whose name matches a term and list them. The vault is unlocked automatically.")]
    pub async fn list_secrets(
        &self,
        Parameters(params): Parameters<ListSecretsParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(render("list_secrets", self.ops.list_secrets(params).await))
    }

    #[tool(description = "Create a new item in the vault. The vault is unlocked automatically. Use get_secret_template first to get the correct JSON structure.")]
    pub async fn create_secret(
        &self,
        Parameters(params): Parameters<CreateSecretParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(render("create_secret", self.ops.create_secret(params).await))
    }

    #[tool(description = "Update an existing item with new JSON. The vault is unlocked automatically.")]
    pub async fn update_secret(
        &self,
        Parameters(params): Parameters<UpdateSecretParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(render("update_secret", self.ops.update_secret(params).await))
    }

    #[tool(description = "Delete an item from the vault. The vault is unlocked automatically.")]
    pub async fn delete_secret(
        &self,
        Parameters(params): Parameters<DeleteSecretParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(render("delete_secret", self.ops.delete_secret(params).await))
    }

    #[tool(description = "Get the JSON structure for an item type (login, note, card, identity).")]
    pub async fn get_secret_template(
        &self,
        Parameters(params): Parameters<TemplateParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(render(
            "get_secret_template",
            self.ops.get_secret_template(params),
        ))
    }

    #[tool(description = "Force a sync of the local vault data with the remote server. The vault is unlocked automatically.")]
    pub async fn sync(&self) -> Result<CallToolResult, McpError> {
        Ok(render("sync", self.ops.sync().await))
    }
}

#[tool_handler]
impl ServerHandler for WardenMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = self.name.clone();
        server_info.version = env!("CARGO_PKG_VERSION").to_string();

        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info = server_info;
        info.instructions = Some(INSTRUCTIONS.to_string());
        info
    }
}

/// Converts an operation outcome into a tool result.
fn render<T: Serialize>(tool: &str, outcome: Result<T, WardenError>) -> CallToolResult {
    match outcome.and_then(|value| to_pretty_json(&value)) {
        Ok(text) => {
            debug!(tool, "tool call succeeded");
            CallToolResult::success(vec![Content::text(text)])
        }
        Err(e) => {
            warn!(tool, error = %e, "tool call failed");
            CallToolResult::error(vec![Content::text(format!("ERROR: {e}"))])
        }
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, WardenError> {
    serde_json::to_string_pretty(value).map_err(|e| WardenError::Server(e.to_string()))
}
