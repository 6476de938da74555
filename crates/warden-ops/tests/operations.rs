// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the vault operations over a scripted CLI.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use warden_core::{CliOutput, WardenError};
use warden_ops::{
    CreateSecretParams, DeleteSecretParams, GetSecretParams, ListSecretsParams, TemplateParams,
    UpdateSecretParams, VaultOperations,
};
use warden_session::{BrokerSettings, FixedPasswordSource, SessionBroker};
use warden_test_utils::{MockUnlock, MockVaultCli};

fn ops_with(cli: Arc<MockVaultCli>) -> VaultOperations {
    let broker = Arc::new(SessionBroker::new(
        cli.clone(),
        Arc::new(FixedPasswordSource::new("master-pw")),
        BrokerSettings::default(),
    ));
    VaultOperations::new(broker, cli, Duration::from_secs(40))
}

fn get(name: &str) -> GetSecretParams {
    GetSecretParams {
        name: name.to_string(),
    }
}

#[tokio::test]
async fn back_to_back_gets_share_one_unlock() {
    let item = r#"{"id":"4f1c","name":"github","login":{"username":"octocat"}}"#;
    let cli = Arc::new(
        MockVaultCli::new().with_outputs(vec![Ok(CliOutput::ok(item)), Ok(CliOutput::ok(item))]),
    );
    let ops = ops_with(cli.clone());

    let first = ops.get_secret(get("github")).await.unwrap();
    let second = ops.get_secret(get("github")).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first["login"]["username"], "octocat");
    assert_eq!(cli.unlock_count(), 1);

    let calls = cli.invocations().await;
    assert_eq!(calls.len(), 2);
    for call in calls {
        assert_eq!(call.args, ["get", "item", "github"]);
        assert_eq!(call.session.as_deref(), Some("mock-session-1"));
        assert_eq!(call.stdin, None);
    }
}

#[tokio::test]
async fn list_secrets_searches_by_term() {
    let cli = Arc::new(MockVaultCli::new().with_outputs(vec![Ok(CliOutput::ok(
        r#"[{"id":"1","name":"github"},{"id":"2","name":"gitlab"}]"#,
    ))]));
    let ops = ops_with(cli.clone());

    let items = ops
        .list_secrets(ListSecretsParams {
            search_term: "git".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(items.as_array().unwrap().len(), 2);
    assert_eq!(
        cli.invocations().await[0].args,
        ["list", "items", "--search", "git"]
    );
}

#[tokio::test]
async fn list_secrets_rejects_non_array_output() {
    let cli = Arc::new(MockVaultCli::new().with_outputs(vec![Ok(CliOutput::ok(r#"{"id":"1"}"#))]));
    let ops = ops_with(cli);

    let err = ops
        .list_secrets(ListSecretsParams {
            search_term: String::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WardenError::InvalidOutput { ref operation, .. } if operation == "list_secrets"));
}

#[tokio::test]
async fn create_secret_sends_encoded_item_on_stdin() {
    let item_json = r#"{"name":"db","type":2,"secureNote":{"type":0},"notes":"s3cr3t"}"#;
    let cli = Arc::new(MockVaultCli::new().with_outputs(vec![Ok(CliOutput::ok(
        r#"{"id":"new-id","name":"db"}"#,
    ))]));
    let ops = ops_with(cli.clone());

    let created = ops
        .create_secret(CreateSecretParams {
            item_json: item_json.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created["id"], "new-id");

    let calls = cli.invocations().await;
    let call = &calls[0];
    assert_eq!(call.args, ["create", "item"]);
    let stdin = call.stdin.as_deref().unwrap();
    assert_eq!(STANDARD.decode(stdin).unwrap(), item_json.as_bytes());
    assert!(!call.args.iter().any(|a| a.contains("s3cr3t")));
}

#[tokio::test]
async fn update_secret_edits_by_id() {
    let item_json = r#"{"name":"db","type":2}"#;
    let cli = Arc::new(MockVaultCli::new().with_outputs(vec![Ok(CliOutput::ok(
        r#"{"id":"abc","name":"db"}"#,
    ))]));
    let ops = ops_with(cli.clone());

    ops.update_secret(UpdateSecretParams {
        id: "abc".to_string(),
        item_json: item_json.to_string(),
    })
    .await
    .unwrap();

    let calls = cli.invocations().await;
    let call = &calls[0];
    assert_eq!(call.args, ["edit", "item", "abc"]);
    assert_eq!(call.stdin.as_deref(), Some(STANDARD.encode(item_json).as_str()));
}

#[tokio::test]
async fn invalid_item_json_never_reaches_the_cli() {
    let cli = Arc::new(MockVaultCli::new());
    let ops = ops_with(cli.clone());

    for item_json in ["not json", "[1,2,3]", "\"a string\""] {
        let err = ops
            .create_secret(CreateSecretParams {
                item_json: item_json.to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WardenError::InvalidInput(_)), "{item_json}: {err:?}");
    }

    let err = ops
        .update_secret(UpdateSecretParams {
            id: "abc".to_string(),
            item_json: "{".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WardenError::InvalidInput(_)));

    assert_eq!(cli.unlock_count(), 0);
    assert!(cli.invocations().await.is_empty());
}

#[tokio::test]
async fn empty_identifiers_are_rejected_before_unlock() {
    let cli = Arc::new(MockVaultCli::new());
    let ops = ops_with(cli.clone());

    assert!(matches!(
        ops.get_secret(get("  ")).await,
        Err(WardenError::InvalidInput(_))
    ));
    assert!(matches!(
        ops.delete_secret(DeleteSecretParams { id: String::new() }).await,
        Err(WardenError::InvalidInput(_))
    ));
    assert_eq!(cli.unlock_count(), 0);
}

#[tokio::test]
async fn delete_and_sync_report_success_messages() {
    let cli = Arc::new(MockVaultCli::new().with_outputs(vec![
        Ok(CliOutput::ok("")),
        Ok(CliOutput::ok("Syncing complete.\n")),
        Ok(CliOutput::ok("")),
    ]));
    let ops = ops_with(cli.clone());

    let deleted = ops
        .delete_secret(DeleteSecretParams {
            id: "abc".to_string(),
        })
        .await
        .unwrap();
    assert!(deleted.success);
    assert_eq!(deleted.message, "Item deleted successfully.");

    let synced = ops.sync().await.unwrap();
    assert_eq!(synced.message, "Syncing complete.");

    let synced = ops.sync().await.unwrap();
    assert_eq!(synced.message, "Sync completed successfully.");

    let calls = cli.invocations().await;
    assert_eq!(calls[0].args, ["delete", "item", "abc"]);
    assert_eq!(calls[1].args, ["sync"]);
    assert_eq!(cli.unlock_count(), 1);
}

#[tokio::test]
async fn failed_command_surfaces_stderr() {
    let cli = Arc::new(MockVaultCli::new().with_outputs(vec![Ok(CliOutput::failed("Not found."))]));
    let ops = ops_with(cli);

    let err = ops.get_secret(get("missing")).await.unwrap_err();
    match err {
        WardenError::ExternalTool { operation, message } => {
            assert_eq!(operation, "get_secret");
            assert_eq!(message, "Not found.");
        }
        other => panic!("expected ExternalTool, got {other:?}"),
    }
}

#[tokio::test]
async fn session_key_is_scrubbed_from_failures() {
    let cli = Arc::new(MockVaultCli::new().with_outputs(vec![Ok(CliOutput::failed(
        "Invalid session: mock-session-1",
    ))]));
    let ops = ops_with(cli);

    let err = ops.sync().await.unwrap_err();
    let text = err.to_string();
    assert!(!text.contains("mock-session-1"));
    assert!(text.contains("[REDACTED]"));
}

#[tokio::test]
async fn unparseable_output_is_invalid_output() {
    let cli = Arc::new(MockVaultCli::new().with_outputs(vec![Ok(CliOutput::ok("? Master password"))]));
    let ops = ops_with(cli);

    let err = ops.get_secret(get("github")).await.unwrap_err();
    assert!(matches!(err, WardenError::InvalidOutput { .. }));
}

#[tokio::test(start_paused = true)]
async fn slow_command_times_out() {
    let cli = Arc::new(MockVaultCli::new().with_run_delay(Duration::from_secs(120)));
    let ops = ops_with(cli);

    let err = ops.sync().await.unwrap_err();
    assert!(
        matches!(err, WardenError::ToolTimeout { ref operation, duration } if operation == "sync" && duration == Duration::from_secs(40)),
        "got {err:?}"
    );
}

#[tokio::test]
async fn unlock_failure_stops_the_operation() {
    let cli = Arc::new(
        MockVaultCli::new().with_unlocks(vec![MockUnlock::Fail("Invalid master password.".into())]),
    );
    let ops = ops_with(cli.clone());

    let err = ops.get_secret(get("github")).await.unwrap_err();
    assert!(matches!(err, WardenError::UnlockFailed(_)));
    assert!(cli.invocations().await.is_empty());

    ops.get_secret(get("github")).await.unwrap();
    assert_eq!(cli.unlock_count(), 2);
}

#[tokio::test]
async fn templates_need_no_session() {
    let cli = Arc::new(MockVaultCli::new());
    let ops = ops_with(cli.clone());

    let login = ops
        .get_secret_template(TemplateParams {
            kind: "login".to_string(),
        })
        .unwrap();
    assert_eq!(login["type"], 1);
    assert!(login["login"]["uris"].is_array());

    let identity = ops
        .get_secret_template(TemplateParams {
            kind: "identity".to_string(),
        })
        .unwrap();
    assert_eq!(identity["identity"]["postalCode"], "");

    let err = ops
        .get_secret_template(TemplateParams {
            kind: "sshkey".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, WardenError::TemplateNotFound(ref t) if t == "sshkey"));

    assert_eq!(cli.unlock_count(), 0);
    assert!(cli.invocations().await.is_empty());
}
