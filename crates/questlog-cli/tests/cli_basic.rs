//! Basic CLI E2E tests.
//!
//! Tests invoke the CLI via cargo run against the dev data directory.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "questlog-cli", "--quiet", "--"])
        .args(args)
        .env("QUESTLOG_ENV", "dev")
        .env("QUESTLOG_USER", "cli-test")
        .output()
        .expect("failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn task_create_and_list() {
    let (stdout, stderr, code) = run_cli(&["task", "create", "CLI smoke quest"]);
    assert_eq!(code, 0, "task create failed: {stderr}");
    assert!(stdout.contains("Created quest"), "unexpected output: {stdout}");

    let (stdout, stderr, code) = run_cli(&["task", "list", "--json"]);
    assert_eq!(code, 0, "task list failed: {stderr}");
    let tasks: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON task list");
    assert!(tasks.as_array().is_some());
}

#[test]
fn rewards_show_reports_ledger() {
    let (stdout, stderr, code) = run_cli(&["rewards", "show"]);
    assert_eq!(code, 0, "rewards show failed: {stderr}");
    assert!(stdout.contains("Points:"), "unexpected output: {stdout}");
}

#[test]
fn unknown_task_update_fails() {
    let (_, stderr, code) = run_cli(&["task", "update", "no-such-id", "--progress", "50"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("not found"), "unexpected stderr: {stderr}");
}
