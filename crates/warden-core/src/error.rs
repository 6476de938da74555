// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for warden.

use std::time::Duration;

use thiserror::Error;

/// The error type shared by the session broker, the vault operations, and the
/// MCP server.
///
/// All variants carry owned strings only, so the type is `Clone`. One failed
/// unlock is fanned out to every caller that was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum WardenError {
    /// Missing or invalid configuration (e.g. the master password variable is unset).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// `bw unlock` reported an error or produced no session key.
    #[error("vault unlock failed: {0}")]
    UnlockFailed(String),

    /// `bw unlock` did not finish within the configured bound.
    #[error("vault unlock timed out after {duration:?}")]
    UnlockTimeout { duration: Duration },

    /// An operation's `bw` invocation exited unsuccessfully.
    #[error("{operation} failed: {message}")]
    ExternalTool { operation: String, message: String },

    /// An operation's `bw` invocation did not finish within the configured bound.
    #[error("{operation} timed out after {duration:?}")]
    ToolTimeout {
        operation: String,
        duration: Duration,
    },

    /// `bw` succeeded but its output could not be interpreted.
    #[error("unexpected output from {operation}: {message}")]
    InvalidOutput { operation: String, message: String },

    /// Caller-supplied parameters were rejected before any external call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested item template type does not exist.
    #[error("unknown template type: {0}")]
    TemplateNotFound(String),

    /// The vault CLI binary could not be started.
    #[error("failed to start `{binary}`: {message}")]
    Spawn { binary: String, message: String },

    /// MCP transport or service failures.
    #[error("server error: {0}")]
    Server(String),
}

impl WardenError {
    /// Whether a caller may reasonably retry the same request unchanged.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            WardenError::UnlockFailed(_)
                | WardenError::UnlockTimeout { .. }
                | WardenError::ToolTimeout { .. }
        )
    }
}
