// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The session broker: cached, single-flight vault unlocking.
//!
//! State is two fields behind one short-held mutex:
//! - `cached`: the last session key and the instant it stops being reused.
//! - `in_flight`: the gate. While an unlock runs it holds the receiving end of
//!   a `watch` channel on which the unlocking caller (the leader) publishes
//!   its outcome. Everyone else who needs a fresh key subscribes and waits.
//!
//! The mutex is never held across an `.await`. The leader owns a
//! [`GateGuard`] that empties the gate however the unlock ends, including
//! when the leader's future is dropped mid-unlock; waiters then see a closed
//! channel and start over.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use secrecy::ExposeSecret;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use warden_config::WardenConfig;
use warden_core::{SessionKey, VaultCli, WardenError, redact};

use crate::password::PasswordSource;

/// How long an unlocked session key is reused by default.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60);

/// Default bound on a single `bw unlock`.
pub const DEFAULT_UNLOCK_TIMEOUT: Duration = Duration::from_secs(40);

/// Timing policy for a [`SessionBroker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokerSettings {
    /// Reuse window for a session key, measured from the end of its unlock.
    pub ttl: Duration,
    /// Bound on the unlock invocation.
    pub unlock_timeout: Duration,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_SESSION_TTL,
            unlock_timeout: DEFAULT_UNLOCK_TIMEOUT,
        }
    }
}

impl BrokerSettings {
    pub fn from_config(config: &WardenConfig) -> Self {
        Self {
            ttl: config.session.ttl(),
            unlock_timeout: config.cli.timeout(),
        }
    }
}

type UnlockOutcome = Option<Result<SessionKey, WardenError>>;

struct CachedSession {
    key: SessionKey,
    expires_at: Instant,
}

#[derive(Default)]
struct BrokerState {
    cached: Option<CachedSession>,
    in_flight: Option<watch::Receiver<UnlockOutcome>>,
}

enum Next {
    Lead(watch::Sender<UnlockOutcome>),
    Wait(watch::Receiver<UnlockOutcome>),
}

/// Owns the vault session key shared by every operation in the process.
///
/// Construct one per process and share it behind an `Arc`.
pub struct SessionBroker {
    cli: Arc<dyn VaultCli>,
    password: Arc<dyn PasswordSource>,
    settings: BrokerSettings,
    state: Mutex<BrokerState>,
}

impl std::fmt::Debug for SessionBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBroker")
            .field("settings", &self.settings)
            .field("has_valid_session", &self.has_valid_session())
            .field("is_unlocking", &self.is_unlocking())
            .finish()
    }
}

impl SessionBroker {
    pub fn new(
        cli: Arc<dyn VaultCli>,
        password: Arc<dyn PasswordSource>,
        settings: BrokerSettings,
    ) -> Self {
        Self {
            cli,
            password,
            settings,
            state: Mutex::new(BrokerState::default()),
        }
    }

    pub fn settings(&self) -> BrokerSettings {
        self.settings
    }

    /// Returns a session key that was valid when it was cached less than one
    /// TTL ago, unlocking the vault first if there is none.
    ///
    /// Concurrent callers that find no usable key share a single unlock: one
    /// of them runs it and all of them receive its key, or its error. A
    /// failed unlock caches nothing, so the next call tries again.
    pub async fn acquire_session(&self) -> Result<SessionKey, WardenError> {
        loop {
            let next = {
                let mut state = self.lock_state();
                if let Some(cached) = &state.cached
                    && cached.expires_at > Instant::now()
                {
                    debug!("reusing cached vault session");
                    return Ok(cached.key.clone());
                }
                match &state.in_flight {
                    Some(rx) => Next::Wait(rx.clone()),
                    None => {
                        let (tx, rx) = watch::channel(None);
                        state.in_flight = Some(rx);
                        Next::Lead(tx)
                    }
                }
            };

            match next {
                Next::Lead(tx) => return self.lead_unlock(tx).await,
                Next::Wait(mut rx) => {
                    debug!("vault unlock already in flight, waiting for it");
                    let outcome = rx.wait_for(Option::is_some).await.map(|o| (*o).clone());
                    match outcome {
                        Ok(Some(result)) => return result,
                        _ => debug!("in-flight unlock was abandoned, re-evaluating"),
                    }
                }
            }
        }
    }

    /// Drops the cached key so the next caller unlocks again.
    pub fn invalidate(&self) {
        if self.lock_state().cached.take().is_some() {
            info!("vault session invalidated");
        }
    }

    /// Whether a key is cached and inside its reuse window.
    pub fn has_valid_session(&self) -> bool {
        self.lock_state()
            .cached
            .as_ref()
            .is_some_and(|c| c.expires_at > Instant::now())
    }

    /// Whether an unlock currently holds the gate.
    pub fn is_unlocking(&self) -> bool {
        self.lock_state().in_flight.is_some()
    }

    fn lock_state(&self) -> MutexGuard<'_, BrokerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn lead_unlock(
        &self,
        tx: watch::Sender<UnlockOutcome>,
    ) -> Result<SessionKey, WardenError> {
        let gate = GateGuard {
            broker: self,
            tx: Some(tx),
        };
        let result = self.unlock().await;
        gate.finish(&result);
        result
    }

    async fn unlock(&self) -> Result<SessionKey, WardenError> {
        let password = self.password.master_password().inspect_err(|e| {
            warn!(error = %e, "cannot unlock vault");
        })?;
        let secret = password.expose_secret();
        let timeout = self.settings.unlock_timeout;

        info!("unlocking vault");
        let output = match tokio::time::timeout(timeout, self.cli.unlock(&password)).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                let message = redact(&e.to_string(), &[secret]);
                warn!(error = %message, "vault unlock could not be run");
                return Err(WardenError::UnlockFailed(message));
            }
            Err(_) => {
                warn!(?timeout, "vault unlock timed out");
                return Err(WardenError::UnlockTimeout { duration: timeout });
            }
        };

        if !output.success {
            let message = redact(&output.diagnostic(), &[secret]);
            warn!(error = %message, "vault unlock rejected");
            return Err(WardenError::UnlockFailed(message));
        }

        let raw = output.stdout.trim();
        if raw.is_empty() {
            warn!("vault unlock returned no session key");
            return Err(WardenError::UnlockFailed(
                "vault CLI returned no session key".to_string(),
            ));
        }

        info!(ttl = ?self.settings.ttl, "vault unlocked");
        Ok(SessionKey::new(raw))
    }
}

/// Used when `now + ttl` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Expiry instant for a key cached now, saturating for oversized TTLs.
fn expiry_after(ttl: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(ttl)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Holds the gate for the leader of an unlock.
///
/// [`finish`](Self::finish) records the outcome and wakes waiters. If the
/// guard is dropped without finishing, the gate is still emptied and the
/// dropped sender tells waiters to re-evaluate.
struct GateGuard<'a> {
    broker: &'a SessionBroker,
    tx: Option<watch::Sender<UnlockOutcome>>,
}

impl GateGuard<'_> {
    fn finish(mut self, result: &Result<SessionKey, WardenError>) {
        {
            let mut state = self.broker.lock_state();
            state.in_flight = None;
            if let Ok(key) = result {
                state.cached = Some(CachedSession {
                    key: key.clone(),
                    expires_at: expiry_after(self.broker.settings.ttl),
                });
            }
        }
        if let Some(tx) = self.tx.take() {
            tx.send_replace(Some(result.clone()));
        }
    }
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        if self.tx.is_some() {
            self.broker.lock_state().in_flight = None;
            debug!("vault unlock abandoned, gate released");
        }
    }
}
