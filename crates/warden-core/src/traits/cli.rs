// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The vault CLI seam.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::WardenError;
use crate::types::{CliInvocation, CliOutput};

/// Access to the external vault command-line tool.
///
/// Implementations only run processes and capture their output. Deciding
/// whether an output means success (empty session key, stderr on a zero
/// exit, malformed JSON) is left to the caller. Timeouts are also applied by
/// the caller, so implementations must be cancel-safe: dropping a pending
/// call must not leave a child process running.
#[async_trait]
pub trait VaultCli: Send + Sync {
    /// Runs the unlock command, handing `master_password` to the child through
    /// a channel that is neither its argument list nor a log line.
    async fn unlock(&self, master_password: &SecretString) -> Result<CliOutput, WardenError>;

    /// Runs an arbitrary vault command.
    async fn run(&self, invocation: CliInvocation) -> Result<CliOutput, WardenError>;
}
