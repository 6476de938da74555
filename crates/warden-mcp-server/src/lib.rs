// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MCP server for warden.
//!
//! Exposes `get_secret`, `list_secrets`, `create_secret`, `update_secret`,
//! `delete_secret`, `get_secret_template` and `sync` as MCP tools over stdio
//! using the `rmcp` crate.

pub mod handler;
pub mod transport;

pub use handler::WardenMcpServer;
pub use transport::serve_stdio;
