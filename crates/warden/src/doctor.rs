// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `warden doctor` command implementation.
//!
//! Checks that the environment can serve vault requests: the `bw` binary
//! runs, it is logged in to a server, and the master password variable is
//! set. Never unlocks the vault and never prints the password.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use warden_config::WardenConfig;
use warden_core::{CliInvocation, VaultCli, WardenError};
use warden_ops::BwCli;
use warden_session::{EnvPasswordSource, PasswordSource};

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Runs the `warden doctor` command. With `plain`, disables colored output.
pub async fn run_doctor(config: &WardenConfig, plain: bool) -> Result<(), WardenError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let cli = BwCli::from_config(&config.cli);
    let timeout = config.cli.timeout();

    let results = vec![
        check_config(config),
        check_bw_binary(&cli, timeout).await,
        check_bw_status(&cli, timeout).await,
        check_master_password(&config.session.master_password_env),
    ];

    println!();
    println!("  warden doctor");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", format_result(result, use_color));
    }
    println!();

    let issues = results
        .iter()
        .filter(|r| r.status != CheckStatus::Pass)
        .count();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

fn format_result(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!(
            "    {symbol} {:<20} {message} ({duration_ms}ms)",
            result.name
        )
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

/// Configuration has already been loaded and validated by the time this runs.
fn check_config(config: &WardenConfig) -> CheckResult {
    let start = Instant::now();
    CheckResult::new(
        "Configuration",
        CheckStatus::Pass,
        format!(
            "valid (session ttl {}s, cli timeout {}s)",
            config.session.ttl_secs, config.cli.timeout_secs
        ),
        start,
    )
}

async fn check_bw_binary(cli: &BwCli, timeout: Duration) -> CheckResult {
    let start = Instant::now();
    match tokio::time::timeout(timeout, cli.version()).await {
        Ok(Ok(version)) => CheckResult::new(
            "bw CLI",
            CheckStatus::Pass,
            format!("{} {version}", cli.binary()),
            start,
        ),
        Ok(Err(e)) => CheckResult::new("bw CLI", CheckStatus::Fail, e.to_string(), start),
        Err(_) => CheckResult::new(
            "bw CLI",
            CheckStatus::Fail,
            format!("no answer within {}s", timeout.as_secs()),
            start,
        ),
    }
}

/// `bw status` needs no session and reports whether a server login exists.
async fn check_bw_status(cli: &BwCli, timeout: Duration) -> CheckResult {
    let start = Instant::now();
    let output = match tokio::time::timeout(timeout, cli.run(CliInvocation::new(["status"]))).await
    {
        Ok(Ok(output)) if output.success => output,
        Ok(Ok(output)) => {
            return CheckResult::new("Vault login", CheckStatus::Fail, output.diagnostic(), start);
        }
        Ok(Err(e)) => {
            return CheckResult::new("Vault login", CheckStatus::Fail, e.to_string(), start);
        }
        Err(_) => {
            return CheckResult::new("Vault login", CheckStatus::Fail, "bw status timed out", start);
        }
    };

    let (status, message) = interpret_status(&output.stdout);
    CheckResult::new("Vault login", status, message, start)
}

fn interpret_status(stdout: &str) -> (CheckStatus, String) {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(stdout.trim()) else {
        return (
            CheckStatus::Warn,
            "could not parse `bw status` output".to_string(),
        );
    };
    let server = value["serverUrl"].as_str().unwrap_or("default server");
    match value["status"].as_str() {
        Some("unauthenticated") => (
            CheckStatus::Fail,
            format!("not logged in to {server}; run `bw login` first"),
        ),
        Some(state) => (CheckStatus::Pass, format!("{state} ({server})")),
        None => (
            CheckStatus::Warn,
            "`bw status` did not report a status".to_string(),
        ),
    }
}

fn check_master_password(var: &str) -> CheckResult {
    let start = Instant::now();
    match EnvPasswordSource::new(var).master_password() {
        Ok(_) => CheckResult::new("Master password", CheckStatus::Pass, format!("{var} is set"), start),
        Err(_) => CheckResult::new(
            "Master password",
            CheckStatus::Fail,
            format!("{var} is not set; unlocks will fail"),
            start,
        ),
    }
}
