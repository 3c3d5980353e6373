use crate::cli::support::{setup_course, tadist_in};
use predicates::prelude::*;
use tempfile::tempdir;

fn stderr_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stderr).unwrap()
}

#[test]
fn test_bad_argument_json_error() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 1);

    let assert = tadist_in(dir.path())
        .args(["--format", "json", "move", "nodot", "s1", "--from", "alice", "--to", "bob"])
        .assert()
        .code(2);
    let error = stderr_json(assert.get_output());
    assert_eq!(error["error"]["code"], 2);
    assert!(error["error"]["message"].is_string());
}

#[test]
fn test_unknown_subcommand_json_error() {
    let dir = tempdir().unwrap();

    let assert = tadist_in(dir.path())
        .args(["frobnicate", "--format", "json"])
        .assert()
        .code(2);
    let error = stderr_json(assert.get_output());
    assert_eq!(error["error"]["code"], 2);
}

#[test]
fn test_human_errors_are_plain_text() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 1);

    tadist_in(dir.path())
        .args(["show", "hw9"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("hw9"))
        .stderr(predicate::str::starts_with("{").not());
}

#[test]
fn test_store_not_found_json_error() {
    let dir = tempdir().unwrap();

    let assert = tadist_in(dir.path())
        .args(["tas", "--format", "json"])
        .assert()
        .code(3);
    let error = stderr_json(assert.get_output());
    assert_eq!(error["error"]["type"], "store_not_found");
}

#[test]
fn test_ta_named_unassigned_is_config_error() {
    let dir = tempdir().unwrap();
    tadist_in(dir.path()).arg("init").assert().success();
    std::fs::write(
        dir.path().join(".tadist/config.toml"),
        "[[tas]]\nlogin = \"unassigned\"\n",
    )
    .unwrap();

    tadist_in(dir.path())
        .arg("tas")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("invalid TA login"));
}
