// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared types passed across the vault CLI seam.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

/// An unlocked-vault session key as returned by `bw unlock --raw`.
///
/// Cloning is cheap (the secret is shared behind an `Arc`). Debug output
/// never shows the key.
#[derive(Clone)]
pub struct SessionKey(Arc<SecretString>);

impl SessionKey {
    /// Wrap a raw session key.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Arc::new(SecretString::from(raw.into())))
    }

    /// Expose the raw key, e.g. to place it in a child process environment.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey([REDACTED])")
    }
}

impl PartialEq for SessionKey {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for SessionKey {}

/// One invocation of the vault CLI.
///
/// `args` never carry secrets: the session key travels in [`session`](Self::session)
/// and item payloads in [`stdin`](Self::stdin), both of which the CLI
/// implementation hands to the child process out of band.
#[derive(Debug, Clone, Default)]
pub struct CliInvocation {
    /// Command-line arguments after the binary name (e.g. `["get", "item", "github"]`).
    pub args: Vec<String>,
    /// Session key for commands that need an unlocked vault.
    pub session: Option<SessionKey>,
    /// Data written to the child's stdin before it is closed.
    pub stdin: Option<String>,
}

impl CliInvocation {
    /// Creates an invocation with the given arguments.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            session: None,
            stdin: None,
        }
    }

    /// Attaches the session key.
    pub fn with_session(mut self, session: SessionKey) -> Self {
        self.session = Some(session);
        self
    }

    /// Attaches data for the child's stdin.
    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = Some(stdin.into());
        self
    }
}

/// Captured result of a finished CLI process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOutput {
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process exited normally.
    pub exit_code: Option<i32>,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl CliOutput {
    /// A successful run that printed `stdout`.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run (exit code 1) that printed `stderr`.
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code: Some(1),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Best available diagnostic: trimmed stderr, or a note about the exit status.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.exit_code {
            Some(code) => format!("process exited with status {code}"),
            None => "process terminated by signal".to_string(),
        }
    }
}
