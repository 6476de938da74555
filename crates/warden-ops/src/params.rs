// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parameter types for the vault operations.
//!
//! Doc comments on fields become the JSON Schema descriptions that MCP
//! clients see.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetSecretParams {
    /// Name or ID of the item to fetch.
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListSecretsParams {
    /// Text to search for in item names.
    pub search_term: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateSecretParams {
    /// The item to create, as a JSON object (see `get_secret_template`).
    pub item_json: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateSecretParams {
    /// ID of the item to update.
    pub id: String,
    /// The full updated item, as a JSON object.
    pub item_json: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeleteSecretParams {
    /// ID of the item to delete.
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TemplateParams {
    /// Item type to get a template for: `login`, `note`, `card` or `identity`.
    #[serde(rename = "type")]
    pub kind: String,
}
