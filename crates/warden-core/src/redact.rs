// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exact-match secret scrubbing for diagnostics coming back from `bw`.
//!
//! The master password and session keys are known at the point where an
//! external diagnostic is wrapped into a [`WardenError`](crate::WardenError),
//! so a plain substring replacement is enough to keep them out of messages.

/// The redaction placeholder.
pub const REDACTED: &str = "[REDACTED]";

/// Replace every occurrence of each secret in `input` with [`REDACTED`].
///
/// Longer secrets are replaced first so that a secret containing another one
/// is not left partially visible. Empty secrets are ignored.
pub fn redact(input: &str, secrets: &[&str]) -> String {
    let mut sorted: Vec<&str> = secrets.iter().copied().filter(|s| !s.is_empty()).collect();
    sorted.sort_by_key(|s| std::cmp::Reverse(s.len()));

    let mut result = input.to_string();
    for secret in sorted {
        result = result.replace(secret, REDACTED);
    }
    result
}
