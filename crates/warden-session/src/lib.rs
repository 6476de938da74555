// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault session management for warden.
//!
//! [`SessionBroker`] owns the cached `bw` session key. It unlocks the vault
//! on demand, lets exactly one unlock run at a time, and hands the resulting
//! key (or failure) to every caller that was waiting for it. The master
//! password is fetched from a [`PasswordSource`] on each unlock attempt and
//! never stored by the broker.

pub mod broker;
pub mod password;

pub use broker::{BrokerSettings, SessionBroker};
pub use password::{EnvPasswordSource, FixedPasswordSource, PasswordSource};
