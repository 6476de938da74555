// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for warden.
//!
//! [`MockVaultCli`] stands in for the `bw` binary so the session broker, the
//! vault operations, and the MCP server can be exercised without a real vault.

pub mod mock_cli;

pub use mock_cli::{MockUnlock, MockVaultCli, RecordedInvocation};
