// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::WardenConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for `cli.timeout_secs`: one hour.
pub const MAX_CLI_TIMEOUT_SECS: u64 = 3_600;

/// Upper bound for `session.ttl_secs`: one day.
pub const MAX_SESSION_TTL_SECS: u64 = 86_400;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &WardenConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.server.name.trim().is_empty() {
        fail("server.name must not be empty".to_string());
    }

    if !LOG_LEVELS.contains(&config.server.log_level.to_ascii_lowercase().as_str()) {
        fail(format!(
            "server.log_level `{}` is not one of {}",
            config.server.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.cli.binary.trim().is_empty() {
        fail("cli.binary must not be empty".to_string());
    }

    if config.cli.timeout_secs == 0 {
        fail("cli.timeout_secs must be at least 1".to_string());
    } else if config.cli.timeout_secs > MAX_CLI_TIMEOUT_SECS {
        fail(format!(
            "cli.timeout_secs must be at most {MAX_CLI_TIMEOUT_SECS}, got {}",
            config.cli.timeout_secs
        ));
    }

    if config.session.ttl_secs == 0 {
        fail("session.ttl_secs must be at least 1".to_string());
    } else if config.session.ttl_secs > MAX_SESSION_TTL_SECS {
        fail(format!(
            "session.ttl_secs must be at most {MAX_SESSION_TTL_SECS}, got {}",
            config.session.ttl_secs
        ));
    }

    let var = &config.session.master_password_env;
    if var.is_empty() || var.contains('=') || var.contains('\0') {
        fail(format!(
            "session.master_password_env `{var}` is not a valid environment variable name"
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
