//! End-to-end tests for the `nexus` binary
//!
//! These run the built binary against a history file in a temporary
//! directory. Nothing here reaches the network.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
mod common;

const SEEDED_HISTORY: &str = r#"[
  {
    "id": "01HZX3ABCDEFGHJKMNPQRSTVWX",
    "title": "What is 2+2?",
    "messages": [
      { "role": "user", "content": "What is 2+2?" },
      { "role": "ai", "content": "4" }
    ]
  }
]"#;

fn nexus_with_config(tmp: &TempDir, config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("nexus").unwrap();
    cmd.current_dir(tmp.path())
        .env_remove("NEXUS_HISTORY_FILE")
        .env_remove("NEXUS_MODEL")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

fn nexus(tmp: &TempDir) -> Command {
    nexus_with_config(tmp, &tmp.path().join("missing.yaml"))
}

#[test]
fn test_history_list_empty() {
    let tmp = TempDir::new().unwrap();
    let history = tmp.path().join("chat_history.json");

    nexus(&tmp)
        .arg("--history-file")
        .arg(&history)
        .arg("history")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No conversation history found"));
}

#[test]
fn test_history_list_shows_stored_chat() {
    let tmp = TempDir::new().unwrap();
    let history = tmp.path().join("chat_history.json");
    fs::write(&history, SEEDED_HISTORY).unwrap();

    nexus(&tmp)
        .arg("--history-file")
        .arg(&history)
        .arg("history")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("What is 2+2?"))
        .stdout(predicate::str::contains("01HZX3ABCDEFGHJKMNPQRSTVWX"));
}

#[test]
fn test_history_show_by_prefix() {
    let tmp = TempDir::new().unwrap();
    let history = tmp.path().join("chat_history.json");
    fs::write(&history, SEEDED_HISTORY).unwrap();

    nexus(&tmp)
        .arg("--history-file")
        .arg(&history)
        .arg("history")
        .arg("show")
        .arg("01hzx3")
        .assert()
        .success()
        .stdout(predicate::str::contains("What is 2+2?"))
        .stdout(predicate::str::contains("4"));
}

#[test]
fn test_history_show_unknown_id_fails() {
    let tmp = TempDir::new().unwrap();
    let history = tmp.path().join("chat_history.json");
    fs::write(&history, SEEDED_HISTORY).unwrap();

    nexus(&tmp)
        .arg("--history-file")
        .arg(&history)
        .arg("history")
        .arg("show")
        .arg("ZZZZ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ZZZZ"));
}

#[test]
fn test_history_file_env_override() {
    let tmp = TempDir::new().unwrap();
    let history = tmp.path().join("from_env.json");
    fs::write(&history, SEEDED_HISTORY).unwrap();

    let mut cmd = nexus(&tmp);
    cmd.env("NEXUS_HISTORY_FILE", &history)
        .arg("history")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("What is 2+2?"));
}

#[test]
fn test_ask_without_api_key_fails() {
    let tmp = TempDir::new().unwrap();

    nexus(&tmp)
        .env_remove("GEMINI_API_KEY")
        .arg("ask")
        .arg("What is 2+2?")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let (_config_dir, config_path) =
        common::temp_config_file("provider:\n  model: gemini-test\n  timeout_seconds: 0\n");

    nexus_with_config(&tmp, &config_path)
        .arg("ask")
        .arg("hi")
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_seconds must be greater than 0"));
}
