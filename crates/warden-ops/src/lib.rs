// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault operations for warden.
//!
//! [`VaultOperations`] turns each remote call (get, list, create, update,
//! delete, template, sync) into one `bw` invocation that runs under the
//! session key handed out by the broker. [`BwCli`] is the process runner
//! that talks to the real Bitwarden CLI.

pub mod bw;
pub mod operations;
pub mod params;
pub mod template;

pub use bw::BwCli;
pub use operations::{ActionOutcome, VaultOperations};
pub use params::{
    CreateSecretParams, DeleteSecretParams, GetSecretParams, ListSecretsParams, TemplateParams,
    UpdateSecretParams,
};
pub use template::TemplateKind;
