mod common;

use assert_cmd::Command;
use common::write_cli_config;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn dorank(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dorank").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd.arg("--config").arg(config);
    cmd
}

fn first_result_id(output: &[u8]) -> String {
    let value: serde_json::Value = serde_json::from_slice(output).unwrap();
    value["results"][0]["id"].as_str().unwrap().to_string()
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("dorank").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Launcher relevance search"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("dorank").unwrap();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_cli_no_args_fails() {
    let mut cmd = Command::cargo_bin("dorank").unwrap();
    cmd.assert().failure();
}

#[test]
fn test_search_json() {
    let tmp = tempdir().unwrap();
    let config = write_cli_config(tmp.path(), "sqlite");

    let output = dorank(&config)
        .args(["search", "fi", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["query"], "fi");
    assert_eq!(value["total"], 3);
    assert_eq!(value["results"][0]["id"], "files");
    assert_eq!(value["results"][0]["match"], "prefix");
}

#[test]
fn test_select_changes_ranking() {
    let tmp = tempdir().unwrap();
    let config = write_cli_config(tmp.path(), "sqlite");

    let before = dorank(&config)
        .args(["search", "fi", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(first_result_id(&before.stdout), "files");

    for _ in 0..2 {
        dorank(&config)
            .args(["select", "firefox", "fi"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Selected firefox"));
    }

    let after = dorank(&config)
        .args(["search", "fi", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(first_result_id(&after.stdout), "firefox");
    assert!(tmp.path().join("cache").join("relevance.db").exists());
}

#[test]
fn test_memory_backend_forgets_between_runs() {
    let tmp = tempdir().unwrap();
    let config = write_cli_config(tmp.path(), "memory");

    dorank(&config).args(["select", "firefox", "fi"]).assert().success();

    let after = dorank(&config)
        .args(["search", "fi", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(first_result_id(&after.stdout), "files");
}

#[test]
fn test_disabled_store_records_nothing() {
    let tmp = tempdir().unwrap();
    let config = write_cli_config(tmp.path(), "none");

    dorank(&config)
        .args(["select", "firefox", "fi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing recorded"));
}

#[test]
fn test_search_kind_filter_ids() {
    let tmp = tempdir().unwrap();
    let config = write_cli_config(tmp.path(), "memory");

    dorank(&config)
        .args(["search", "--kind", "folder", "--format", "ids"])
        .assert()
        .success()
        .stdout("documents\n");
}

#[test]
fn test_search_context_filter() {
    let tmp = tempdir().unwrap();
    let config = write_cli_config(tmp.path(), "memory");

    dorank(&config)
        .args(["search", "--kind", "action", "--context", "documents", "--format", "ids"])
        .assert()
        .success()
        .stdout("open\n");

    dorank(&config)
        .args(["search", "--kind", "action", "--context", "firefox", "--format", "ids"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_search_no_match_is_empty_not_error() {
    let tmp = tempdir().unwrap();
    let config = write_cli_config(tmp.path(), "memory");

    dorank(&config)
        .args(["search", "zzz", "--format", "ids"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_unknown_kind_fails() {
    let tmp = tempdir().unwrap();
    let config = write_cli_config(tmp.path(), "memory");

    dorank(&config)
        .args(["search", "fi", "--kind", "gadget"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gadget"));
}

#[test]
fn test_select_unknown_item_fails() {
    let tmp = tempdir().unwrap();
    let config = write_cli_config(tmp.path(), "memory");

    dorank(&config)
        .args(["select", "nope", "fi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_items_and_status() {
    let tmp = tempdir().unwrap();
    let config = write_cli_config(tmp.path(), "sqlite");

    dorank(&config)
        .args(["items", "--kind", "action", "--format", "ids"])
        .assert()
        .success()
        .stdout("open\n");

    dorank(&config).args(["select", "firefox", "fi"]).assert().success();

    dorank(&config)
        .args(["status", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Catalog items: 5"))
        .stdout(predicate::str::contains("Records: 2"))
        .stdout(predicate::str::contains("firefox for \"fi\""));
}

#[test]
fn test_cleanup() {
    let tmp = tempdir().unwrap();
    let config = write_cli_config(tmp.path(), "sqlite");

    dorank(&config).args(["select", "firefox", "fi"]).assert().success();

    dorank(&config)
        .args(["cleanup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No stale entries found"));

    dorank(&config)
        .args(["cleanup", "--all", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    dorank(&config)
        .args(["cleanup", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 entries removed"));

    dorank(&config)
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Records: 0"));
}
