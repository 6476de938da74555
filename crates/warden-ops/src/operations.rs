// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The seven vault operations.
//!
//! Every operation except `get_secret_template` follows the same path:
//! validate parameters, acquire the session key from the broker, run one
//! bounded `bw` invocation, then interpret its output. Parameters are
//! checked before the broker is touched, so a malformed request never
//! triggers an unlock.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use warden_core::{CliInvocation, VaultCli, WardenError, redact};
use warden_session::SessionBroker;

use crate::params::{
    CreateSecretParams, DeleteSecretParams, GetSecretParams, ListSecretsParams, TemplateParams,
    UpdateSecretParams,
};
use crate::template::TemplateKind;

const DELETED_MESSAGE: &str = "Item deleted successfully.";
const SYNCED_MESSAGE: &str = "Sync completed successfully.";

/// Result of an operation that produces no item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    fn from_stdout(stdout: &str, fallback: &str) -> Self {
        let message = stdout.trim();
        Self {
            success: true,
            message: if message.is_empty() {
                fallback.to_string()
            } else {
                message.to_string()
            },
        }
    }
}

/// Executes vault operations under the broker's session key.
pub struct VaultOperations {
    broker: Arc<SessionBroker>,
    cli: Arc<dyn VaultCli>,
    timeout: Duration,
}

impl VaultOperations {
    /// `timeout` bounds each `bw` invocation (the unlock has its own bound).
    pub fn new(broker: Arc<SessionBroker>, cli: Arc<dyn VaultCli>, timeout: Duration) -> Self {
        Self {
            broker,
            cli,
            timeout,
        }
    }

    pub fn broker(&self) -> &Arc<SessionBroker> {
        &self.broker
    }

    /// Fetches one item by name or ID.
    pub async fn get_secret(&self, params: GetSecretParams) -> Result<Value, WardenError> {
        let name = require_non_empty("name", &params.name)?;
        let stdout = self
            .invoke("get_secret", CliInvocation::new(["get", "item", name]))
            .await?;
        parse_json("get_secret", &stdout)
    }

    /// Lists items whose names match `search_term`.
    pub async fn list_secrets(&self, params: ListSecretsParams) -> Result<Value, WardenError> {
        let invocation =
            CliInvocation::new(["list", "items", "--search", params.search_term.as_str()]);
        let stdout = self.invoke("list_secrets", invocation).await?;
        let items = parse_json("list_secrets", &stdout)?;
        if !items.is_array() {
            return Err(WardenError::InvalidOutput {
                operation: "list_secrets".to_string(),
                message: "expected a JSON array of items".to_string(),
            });
        }
        Ok(items)
    }

    pub async fn create_secret(&self, params: CreateSecretParams) -> Result<Value, WardenError> {
        let encoded = encode_item(&params.item_json)?;
        let invocation = CliInvocation::new(["create", "item"]).with_stdin(encoded);
        let stdout = self.invoke("create_secret", invocation).await?;
        parse_json("create_secret", &stdout)
    }

    /// Replaces an existing item with `item_json`.
    pub async fn update_secret(&self, params: UpdateSecretParams) -> Result<Value, WardenError> {
        let id = require_non_empty("id", &params.id)?;
        let encoded = encode_item(&params.item_json)?;
        let invocation = CliInvocation::new(["edit", "item", id]).with_stdin(encoded);
        let stdout = self.invoke("update_secret", invocation).await?;
        parse_json("update_secret", &stdout)
    }

    pub async fn delete_secret(
        &self,
        params: DeleteSecretParams,
    ) -> Result<ActionOutcome, WardenError> {
        let id = require_non_empty("id", &params.id)?;
        let stdout = self
            .invoke("delete_secret", CliInvocation::new(["delete", "item", id]))
            .await?;
        Ok(ActionOutcome::from_stdout(&stdout, DELETED_MESSAGE))
    }

    /// Returns the item skeleton for a type. Needs no session.
    pub fn get_secret_template(&self, params: TemplateParams) -> Result<Value, WardenError> {
        let kind: TemplateKind = params
            .kind
            .parse()
            .map_err(|_| WardenError::TemplateNotFound(params.kind.clone()))?;
        Ok(kind.template())
    }

    /// Pulls the latest vault data from the server.
    pub async fn sync(&self) -> Result<ActionOutcome, WardenError> {
        let stdout = self.invoke("sync", CliInvocation::new(["sync"])).await?;
        Ok(ActionOutcome::from_stdout(&stdout, SYNCED_MESSAGE))
    }

    /// Acquires a session and runs one bounded `bw` command.
    ///
    /// The exit status alone decides success. Output on stderr with a zero
    /// exit (update notices, deprecation warnings) is logged at `warn` and
    /// never fails the call.
    async fn invoke(
        &self,
        operation: &str,
        invocation: CliInvocation,
    ) -> Result<String, WardenError> {
        let session = self.broker.acquire_session().await?;
        let key = session.clone();
        let invocation = invocation.with_session(session);

        debug!(operation, "running vault command");
        let output = match tokio::time::timeout(self.timeout, self.cli.run(invocation)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(operation, timeout = ?self.timeout, "vault command timed out");
                return Err(WardenError::ToolTimeout {
                    operation: operation.to_string(),
                    duration: self.timeout,
                });
            }
        };

        if !output.success {
            let message = redact(&output.diagnostic(), &[key.expose()]);
            warn!(operation, error = %message, "vault command failed");
            return Err(WardenError::ExternalTool {
                operation: operation.to_string(),
                message,
            });
        }

        let stderr = output.stderr.trim();
        if !stderr.is_empty() {
            warn!(
                operation,
                stderr = %redact(stderr, &[key.expose()]),
                "vault command succeeded with diagnostics"
            );
        }

        Ok(output.stdout)
    }
}

fn require_non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str, WardenError> {
    if value.trim().is_empty() {
        return Err(WardenError::InvalidInput(format!("`{field}` must not be empty")));
    }
    Ok(value)
}

/// Checks that `item_json` is a JSON object and encodes it the way
/// `bw create`/`bw edit` expect on stdin.
fn encode_item(item_json: &str) -> Result<String, WardenError> {
    let item: Value = serde_json::from_str(item_json)
        .map_err(|e| WardenError::InvalidInput(format!("`item_json` is not valid JSON: {e}")))?;
    if !item.is_object() {
        return Err(WardenError::InvalidInput(
            "`item_json` must be a JSON object".to_string(),
        ));
    }
    Ok(STANDARD.encode(item_json))
}

fn parse_json(operation: &str, stdout: &str) -> Result<Value, WardenError> {
    serde_json::from_str(stdout.trim()).map_err(|e| WardenError::InvalidOutput {
        operation: operation.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;
    use warden_core::CliOutput;
    use warden_session::{BrokerSettings, FixedPasswordSource};
    use warden_test_utils::MockVaultCli;

    use super::*;

    fn ops(cli: Arc<MockVaultCli>) -> VaultOperations {
        let broker = Arc::new(SessionBroker::new(
            cli.clone(),
            Arc::new(FixedPasswordSource::new("pw")),
            BrokerSettings::default(),
        ));
        VaultOperations::new(broker, cli, Duration::from_secs(40))
    }

    #[test]
    fn encode_item_accepts_objects_only() {
        assert_eq!(encode_item(r#"{"a":1}"#).unwrap(), "eyJhIjoxfQ==");
        assert!(matches!(encode_item("[1]"), Err(WardenError::InvalidInput(_))));
        assert!(matches!(encode_item("nope"), Err(WardenError::InvalidInput(_))));
    }

    #[test]
    fn action_outcome_falls_back_on_empty_stdout() {
        assert_eq!(ActionOutcome::from_stdout("  \n", SYNCED_MESSAGE).message, SYNCED_MESSAGE);
        assert_eq!(
            ActionOutcome::from_stdout("Syncing complete.\n", SYNCED_MESSAGE).message,
            "Syncing complete."
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn stderr_on_success_is_logged_not_failed() {
        let cli = Arc::new(MockVaultCli::new().with_outputs(vec![Ok(CliOutput {
            success: true,
            exit_code: Some(0),
            stdout: r#"{"id":"abc"}"#.to_string(),
            stderr: "A new version is available: 2026.9.0".to_string(),
        })]));
        let ops = ops(cli);

        let item = ops
            .get_secret(GetSecretParams {
                name: "github".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(item["id"], "abc");
        assert!(logs_contain("vault command succeeded with diagnostics"));
        assert!(logs_contain("A new version is available"));
        assert!(!logs_contain("mock-session-1"));
    }
}
