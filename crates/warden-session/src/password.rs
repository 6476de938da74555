// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master password sources.

use secrecy::SecretString;
use warden_core::WardenError;

/// Supplies the vault master password on demand.
///
/// Called once per unlock attempt, so a missing password surfaces on first
/// use rather than at startup, and an operator can fix the environment
/// without restarting the server.
pub trait PasswordSource: Send + Sync {
    fn master_password(&self) -> Result<SecretString, WardenError>;
}

/// Reads the master password from a named environment variable.
#[derive(Debug, Clone)]
pub struct EnvPasswordSource {
    var: String,
}

impl EnvPasswordSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the variable this source reads.
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl PasswordSource for EnvPasswordSource {
    fn master_password(&self) -> Result<SecretString, WardenError> {
        match std::env::var(&self.var) {
            Ok(value) if !value.is_empty() => Ok(SecretString::from(value)),
            _ => Err(WardenError::Configuration(format!(
                "environment variable {} is not set",
                self.var
            ))),
        }
    }
}

/// A password fixed at construction time, for embedding and tests.
pub struct FixedPasswordSource(SecretString);

impl FixedPasswordSource {
    pub fn new(password: impl Into<String>) -> Self {
        Self(SecretString::from(password.into()))
    }
}

impl std::fmt::Debug for FixedPasswordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FixedPasswordSource([REDACTED])")
    }
}

impl PasswordSource for FixedPasswordSource {
    fn master_password(&self) -> Result<SecretString, WardenError> {
        use secrecy::ExposeSecret;
        Ok(SecretString::from(self.0.expose_secret().to_string()))
    }
}
