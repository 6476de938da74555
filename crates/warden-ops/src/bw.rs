// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bitwarden CLI (`bw`) process runner.
//!
//! Secrets reach the child only through its environment: the master password
//! as `BW_PASSWORD` (read by `bw unlock --passwordenv`), the session key as
//! `BW_SESSION`. Nothing secret is placed on the command line, and no shell
//! is involved.

use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;
use warden_config::model::CliConfig;
use warden_core::{CliInvocation, CliOutput, VaultCli, WardenError};

/// Variable `bw` reads the session key from.
pub const SESSION_ENV: &str = "BW_SESSION";

/// Variable the master password is handed over in during unlock.
pub const PASSWORD_ENV: &str = "BW_PASSWORD";

/// Runs the real `bw` binary.
#[derive(Debug, Clone)]
pub struct BwCli {
    binary: String,
}

impl BwCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn from_config(config: &CliConfig) -> Self {
        Self::new(config.binary.clone())
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Runs `bw --version`, for health checks.
    pub async fn version(&self) -> Result<String, WardenError> {
        let output = self.execute(self.command(["--version"]), None).await?;
        if output.success {
            Ok(output.stdout.trim().to_string())
        } else {
            Err(WardenError::ExternalTool {
                operation: "version".to_string(),
                message: output.diagnostic(),
            })
        }
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .env("BW_NOINTERACTION", "true")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn execute(&self, mut cmd: Command, stdin: Option<&str>) -> Result<CliOutput, WardenError> {
        if stdin.is_some() {
            cmd.stdin(Stdio::piped());
        }

        let mut child = cmd.spawn().map_err(|e| WardenError::Spawn {
            binary: self.binary.clone(),
            message: e.to_string(),
        })?;

        if let Some(data) = stdin
            && let Some(mut pipe) = child.stdin.take()
        {
            // A child that exits without reading stdin is reported through its exit status.
            if let Err(e) = pipe.write_all(data.as_bytes()).await {
                debug!(error = %e, "vault CLI closed stdin early");
            }
            drop(pipe);
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| WardenError::Spawn {
                binary: self.binary.clone(),
                message: format!("failed to collect output: {e}"),
            })?;

        Ok(to_cli_output(output.status, &output.stdout, &output.stderr))
    }
}

fn to_cli_output(status: ExitStatus, stdout: &[u8], stderr: &[u8]) -> CliOutput {
    CliOutput {
        success: status.success(),
        exit_code: status.code(),
        stdout: String::from_utf8_lossy(stdout).into_owned(),
        stderr: String::from_utf8_lossy(stderr).into_owned(),
    }
}

#[async_trait]
impl VaultCli for BwCli {
    async fn unlock(&self, master_password: &SecretString) -> Result<CliOutput, WardenError> {
        let mut cmd = self.command(["unlock", "--passwordenv", PASSWORD_ENV, "--raw"]);
        cmd.env(PASSWORD_ENV, master_password.expose_secret())
            .env_remove(SESSION_ENV);
        debug!(binary = %self.binary, "running bw unlock");
        self.execute(cmd, None).await
    }

    async fn run(&self, invocation: CliInvocation) -> Result<CliOutput, WardenError> {
        let mut cmd = self.command(&invocation.args);
        cmd.env_remove(PASSWORD_ENV);
        match &invocation.session {
            Some(session) => cmd.env(SESSION_ENV, session.expose()),
            None => cmd.env_remove(SESSION_ENV),
        };
        debug!(binary = %self.binary, args = ?invocation.args, "running bw");
        self.execute(cmd, invocation.stdin.as_deref()).await
    }
}
