// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Behavioral tests for the session broker against a scripted vault CLI.

use std::sync::Arc;
use std::time::Duration;

use warden_core::{SessionKey, WardenError};
use warden_session::{BrokerSettings, EnvPasswordSource, FixedPasswordSource, SessionBroker};
use warden_test_utils::{MockUnlock, MockVaultCli};

const PASSWORD: &str = "correct horse battery staple";

fn broker_with(cli: Arc<MockVaultCli>) -> Arc<SessionBroker> {
    Arc::new(SessionBroker::new(
        cli,
        Arc::new(FixedPasswordSource::new(PASSWORD)),
        BrokerSettings::default(),
    ))
}

async fn acquire_concurrently(
    broker: &Arc<SessionBroker>,
    callers: usize,
) -> Vec<Result<SessionKey, WardenError>> {
    let handles: Vec<_> = (0..callers)
        .map(|_| {
            let broker = broker.clone();
            tokio::spawn(async move { broker.acquire_session().await })
        })
        .collect();

    let mut results = Vec::with_capacity(callers);
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    results
}

#[tokio::test(start_paused = true)]
async fn concurrent_callers_share_one_unlock() {
    let cli = Arc::new(MockVaultCli::new().with_unlock_delay(Duration::from_millis(100)));
    let broker = broker_with(cli.clone());

    let results = acquire_concurrently(&broker, 20).await;

    assert_eq!(cli.unlock_count(), 1);
    for result in results {
        assert_eq!(result.unwrap().expose(), "mock-session-1");
    }
    assert!(!broker.is_unlocking());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_callers_share_one_unlock() {
    let cli = Arc::new(MockVaultCli::new().with_unlock_delay(Duration::from_millis(50)));
    let broker = broker_with(cli.clone());

    let results = acquire_concurrently(&broker, 32).await;

    assert_eq!(cli.unlock_count(), 1);
    assert!(
        results
            .iter()
            .all(|r| r.as_ref().is_ok_and(|k| k.expose() == "mock-session-1"))
    );
}

#[tokio::test(start_paused = true)]
async fn cached_key_is_reused_within_ttl() {
    let cli = Arc::new(MockVaultCli::new());
    let broker = broker_with(cli.clone());

    let first = broker.acquire_session().await.unwrap();
    tokio::time::advance(Duration::from_secs(59)).await;
    let second = broker.acquire_session().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(cli.unlock_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn expired_key_triggers_exactly_one_fresh_unlock() {
    let cli = Arc::new(MockVaultCli::new().with_unlock_delay(Duration::from_millis(10)));
    let broker = broker_with(cli.clone());

    broker.acquire_session().await.unwrap();
    tokio::time::advance(Duration::from_secs(61)).await;
    assert!(!broker.has_valid_session());

    let results = acquire_concurrently(&broker, 5).await;

    assert_eq!(cli.unlock_count(), 2);
    for result in results {
        assert_eq!(result.unwrap().expose(), "mock-session-2");
    }
}

#[tokio::test]
async fn failed_unlock_is_not_cached_and_next_call_retries() {
    let cli = Arc::new(MockVaultCli::new().with_unlocks(vec![MockUnlock::Fail(
        "Invalid master password.".to_string(),
    )]));
    let broker = broker_with(cli.clone());

    let err = broker.acquire_session().await.unwrap_err();
    assert!(
        matches!(err, WardenError::UnlockFailed(ref m) if m == "Invalid master password."),
        "got {err:?}"
    );
    assert!(!broker.has_valid_session());
    assert!(!broker.is_unlocking());

    let key = broker.acquire_session().await.unwrap();
    assert_eq!(key.expose(), "mock-session-2");
    assert_eq!(cli.unlock_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn waiters_receive_the_leaders_failure() {
    let cli = Arc::new(
        MockVaultCli::new()
            .with_unlock_delay(Duration::from_millis(100))
            .with_unlocks(vec![MockUnlock::Fail("vault is unreachable".to_string())]),
    );
    let broker = broker_with(cli.clone());

    let results = acquire_concurrently(&broker, 8).await;

    assert_eq!(cli.unlock_count(), 1);
    for result in results {
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "vault unlock failed: vault is unreachable");
    }
    assert!(!broker.has_valid_session());
}

#[tokio::test]
async fn empty_unlock_output_is_a_failure() {
    let cli = Arc::new(MockVaultCli::new().with_unlocks(vec![MockUnlock::Empty]));
    let broker = broker_with(cli.clone());

    let err = broker.acquire_session().await.unwrap_err();
    assert!(matches!(err, WardenError::UnlockFailed(_)));
    assert!(!broker.has_valid_session());
}

#[tokio::test(start_paused = true)]
async fn hung_unlock_times_out_and_releases_the_gate() {
    let cli = Arc::new(MockVaultCli::new().with_unlocks(vec![MockUnlock::Hang]));
    let broker = broker_with(cli.clone());

    let err = broker.acquire_session().await.unwrap_err();
    assert!(
        matches!(err, WardenError::UnlockTimeout { duration } if duration == Duration::from_secs(40)),
        "got {err:?}"
    );
    assert!(!broker.is_unlocking());

    let key = broker.acquire_session().await.unwrap();
    assert_eq!(key.expose(), "mock-session-2");
    assert_eq!(cli.unlock_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn unlock_timeout_follows_settings() {
    let cli = Arc::new(MockVaultCli::new().with_unlocks(vec![MockUnlock::Hang]));
    let settings = BrokerSettings {
        ttl: Duration::from_secs(60),
        unlock_timeout: Duration::from_secs(3),
    };
    let broker = SessionBroker::new(
        cli,
        Arc::new(FixedPasswordSource::new(PASSWORD)),
        settings,
    );

    let started = tokio::time::Instant::now();
    let err = broker.acquire_session().await.unwrap_err();
    assert!(matches!(err, WardenError::UnlockTimeout { .. }));
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_secs(40));
}

#[tokio::test]
async fn oversized_ttl_caches_without_overflow() {
    let mut config = warden_config::WardenConfig::default();
    config.session.ttl_secs = u64::MAX;
    assert!(warden_config::validation::validate_config(&config).is_err());

    let cli = Arc::new(MockVaultCli::new());
    let broker = SessionBroker::new(
        cli.clone(),
        Arc::new(FixedPasswordSource::new(PASSWORD)),
        BrokerSettings::from_config(&config),
    );

    let first = broker.acquire_session().await.unwrap();
    let second = broker.acquire_session().await.unwrap();

    assert_eq!(first, second);
    assert!(broker.has_valid_session());
    assert_eq!(cli.unlock_count(), 1);

    let broker = SessionBroker::new(
        cli.clone(),
        Arc::new(FixedPasswordSource::new(PASSWORD)),
        BrokerSettings {
            ttl: Duration::MAX,
            unlock_timeout: Duration::from_secs(40),
        },
    );
    assert!(broker.acquire_session().await.is_ok());
    assert!(broker.has_valid_session());
}

#[tokio::test(start_paused = true)]
async fn cancelled_leader_releases_the_gate() {
    let cli = Arc::new(MockVaultCli::new().with_unlocks(vec![MockUnlock::Hang]));
    let broker = broker_with(cli.clone());

    let leader = tokio::spawn({
        let broker = broker.clone();
        async move { broker.acquire_session().await }
    });
    tokio::task::yield_now().await;
    assert!(broker.is_unlocking());

    let waiter = tokio::spawn({
        let broker = broker.clone();
        async move { broker.acquire_session().await }
    });
    tokio::task::yield_now().await;

    leader.abort();
    assert!(leader.await.unwrap_err().is_cancelled());

    let key = waiter.await.unwrap().unwrap();
    assert_eq!(key.expose(), "mock-session-2");
    assert_eq!(cli.unlock_count(), 2);
    assert!(!broker.is_unlocking());
}

#[tokio::test]
async fn missing_master_password_is_a_configuration_error() {
    let cli = Arc::new(MockVaultCli::new());
    let broker = SessionBroker::new(
        cli.clone(),
        Arc::new(EnvPasswordSource::new("WARDEN_TEST_PASSWORD_NEVER_SET")),
        BrokerSettings::default(),
    );

    for _ in 0..2 {
        let result =
            tokio::time::timeout(Duration::from_secs(5), broker.acquire_session()).await;
        let err = result.expect("gate must not stay held").unwrap_err();
        assert!(
            matches!(err, WardenError::Configuration(ref m) if m.contains("WARDEN_TEST_PASSWORD_NEVER_SET"))
        );
    }
    assert_eq!(cli.unlock_count(), 0);
    assert!(!broker.is_unlocking());
}

#[tokio::test]
async fn unlock_receives_the_master_password() {
    let cli = Arc::new(MockVaultCli::new());
    let broker = broker_with(cli.clone());

    broker.acquire_session().await.unwrap();
    assert_eq!(cli.passwords().await, vec![PASSWORD]);
}
