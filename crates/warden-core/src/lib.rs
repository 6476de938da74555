// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for warden, the Bitwarden CLI bridge for MCP clients.
//!
//! This crate holds the pieces every other warden crate agrees on: the
//! [`WardenError`] taxonomy, the [`VaultCli`] seam through which all calls to
//! the external `bw` binary flow, and the [`SessionKey`] newtype that keeps
//! unlocked-vault credentials out of logs.

pub mod error;
pub mod redact;
pub mod traits;
pub mod types;

pub use error::WardenError;
pub use redact::redact;
pub use traits::VaultCli;
pub use types::{CliInvocation, CliOutput, SessionKey};
