// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for warden.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is a
//! startup error instead of a silently ignored setting.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level warden configuration.
///
/// Every section is optional and defaults to the values below. The master
/// password itself is never part of this struct: only the *name* of the
/// environment variable holding it is configurable.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WardenConfig {
    /// MCP server identity and logging.
    #[serde(default)]
    pub server: ServerConfig,

    /// How the Bitwarden CLI is invoked.
    #[serde(default)]
    pub cli: CliConfig,

    /// Session key caching and master password lookup.
    #[serde(default)]
    pub session: SessionConfig,
}

/// MCP server identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Name reported to MCP clients during initialization.
    #[serde(default = "default_server_name")]
    pub name: String,

    /// Default tracing level when `RUST_LOG` is unset (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_server_name() -> String {
    "warden".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Bitwarden CLI invocation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Path to, or name on `PATH` of, the `bw` binary.
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Upper bound in seconds on every `bw` invocation, unlock included.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CliConfig {
    /// The invocation bound as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_binary() -> String {
    "bw".to_string()
}

fn default_timeout_secs() -> u64 {
    40
}

/// Session key cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// How long, in seconds, an unlocked session key is reused before the
    /// vault is unlocked again.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Environment variable holding the vault master password. Read on each
    /// unlock, never at startup.
    #[serde(default = "default_master_password_env")]
    pub master_password_env: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            master_password_env: default_master_password_env(),
        }
    }
}

impl SessionConfig {
    /// The cache TTL as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

fn default_ttl_secs() -> u64 {
    60
}

fn default_master_password_env() -> String {
    "BW_MASTER_PASSWORD".to_string()
}
