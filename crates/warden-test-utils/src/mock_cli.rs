// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scriptable vault CLI for deterministic tests.
//!
//! Unlock outcomes and command outputs are popped from FIFO queues. When a
//! queue is empty the mock falls back to a successful default: unlocks yield
//! `mock-session-<n>` and commands print `{}`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;

use warden_core::{CliInvocation, CliOutput, VaultCli, WardenError};

/// Scripted outcome of one `unlock` call.
#[derive(Debug, Clone)]
pub enum MockUnlock {
    /// Exit 0 and print this session key.
    Key(String),
    /// Exit 1 and print this diagnostic on stderr.
    Fail(String),
    /// Exit 0 with nothing on stdout.
    Empty,
    /// Never finish; only a caller-side timeout or cancellation ends the call.
    Hang,
}

/// What the mock saw for one `run` call, with the session key exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedInvocation {
    pub args: Vec<String>,
    pub session: Option<String>,
    pub stdin: Option<String>,
}

/// A [`VaultCli`] that records every call and replays scripted outcomes.
pub struct MockVaultCli {
    unlocks: Mutex<VecDeque<MockUnlock>>,
    outputs: Mutex<VecDeque<Result<CliOutput, WardenError>>>,
    unlock_delay: Duration,
    run_delay: Duration,
    unlock_count: AtomicUsize,
    passwords: Mutex<Vec<String>>,
    invocations: Mutex<Vec<RecordedInvocation>>,
}

impl MockVaultCli {
    /// A mock whose unlocks and commands all succeed immediately.
    pub fn new() -> Self {
        Self {
            unlocks: Mutex::new(VecDeque::new()),
            outputs: Mutex::new(VecDeque::new()),
            unlock_delay: Duration::ZERO,
            run_delay: Duration::ZERO,
            unlock_count: AtomicUsize::new(0),
            passwords: Mutex::new(Vec::new()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Make every unlock sleep for `delay` before answering.
    pub fn with_unlock_delay(mut self, delay: Duration) -> Self {
        self.unlock_delay = delay;
        self
    }

    /// Make every command sleep for `delay` before answering.
    pub fn with_run_delay(mut self, delay: Duration) -> Self {
        self.run_delay = delay;
        self
    }

    /// Pre-load unlock outcomes.
    pub fn with_unlocks(mut self, unlocks: Vec<MockUnlock>) -> Self {
        self.unlocks = Mutex::new(VecDeque::from(unlocks));
        self
    }

    /// Pre-load command outputs.
    pub fn with_outputs(mut self, outputs: Vec<Result<CliOutput, WardenError>>) -> Self {
        self.outputs = Mutex::new(VecDeque::from(outputs));
        self
    }

    /// Queue another unlock outcome.
    pub async fn push_unlock(&self, unlock: MockUnlock) {
        self.unlocks.lock().await.push_back(unlock);
    }

    /// Queue another command output.
    pub async fn push_output(&self, output: Result<CliOutput, WardenError>) {
        self.outputs.lock().await.push_back(output);
    }

    /// Number of `unlock` calls started so far.
    pub fn unlock_count(&self) -> usize {
        self.unlock_count.load(Ordering::SeqCst)
    }

    /// Master passwords received by `unlock`, in call order.
    pub async fn passwords(&self) -> Vec<String> {
        self.passwords.lock().await.clone()
    }

    /// Every `run` call so far, in call order.
    pub async fn invocations(&self) -> Vec<RecordedInvocation> {
        self.invocations.lock().await.clone()
    }
}

impl Default for MockVaultCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VaultCli for MockVaultCli {
    async fn unlock(&self, master_password: &SecretString) -> Result<CliOutput, WardenError> {
        let n = self.unlock_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.passwords
            .lock()
            .await
            .push(master_password.expose_secret().to_string());

        let scripted = self.unlocks.lock().await.pop_front();

        if !self.unlock_delay.is_zero() {
            tokio::time::sleep(self.unlock_delay).await;
        }

        match scripted.unwrap_or_else(|| MockUnlock::Key(format!("mock-session-{n}"))) {
            MockUnlock::Key(key) => Ok(CliOutput::ok(format!("{key}\n"))),
            MockUnlock::Fail(stderr) => Ok(CliOutput::failed(stderr)),
            MockUnlock::Empty => Ok(CliOutput::ok("")),
            MockUnlock::Hang => std::future::pending().await,
        }
    }

    async fn run(&self, invocation: CliInvocation) -> Result<CliOutput, WardenError> {
        self.invocations.lock().await.push(RecordedInvocation {
            args: invocation.args.clone(),
            session: invocation.session.as_ref().map(|s| s.expose().to_string()),
            stdin: invocation.stdin.clone(),
        });

        let scripted = self.outputs.lock().await.pop_front();

        if !self.run_delay.is_zero() {
            tokio::time::sleep(self.run_delay).await;
        }

        scripted.unwrap_or_else(|| Ok(CliOutput::ok("{}")))
    }
}
