// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for warden's external collaborators.
//!
//! Traits use `#[async_trait]` so they can be held as `Arc<dyn _>`.

pub mod cli;

pub use cli::VaultCli;
