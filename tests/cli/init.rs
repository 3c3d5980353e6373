use crate::cli::support::{tadist, tadist_in};
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_init_creates_store() {
    let dir = tempdir().unwrap();

    tadist_in(dir.path())
        .args(["init", "--course", "CS 101"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized tadist store"));

    assert!(dir.path().join(".tadist/config.toml").exists());
    assert!(dir.path().join(".tadist/tadist.db").exists());
    assert!(dir.path().join(".tadist/sheets").is_dir());

    let config: toml::Value =
        toml::from_str(&fs::read_to_string(dir.path().join(".tadist/config.toml")).unwrap())
            .unwrap();
    assert_eq!(config["course"].as_str(), Some("CS 101"));
}

#[test]
fn test_init_idempotent() {
    let dir = tempdir().unwrap();

    tadist_in(dir.path()).arg("init").assert().success();
    fs::write(
        dir.path().join(".tadist/config.toml"),
        "version = 1\n\n[[tas]]\nlogin = \"alice\"\n",
    )
    .unwrap();

    tadist_in(dir.path()).arg("init").assert().success();

    tadist_in(dir.path())
        .arg("tas")
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"));
}

#[test]
fn test_init_json() {
    let dir = tempdir().unwrap();

    tadist_in(dir.path())
        .args(["init", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"ok\""));
}

#[test]
fn test_init_at_explicit_store() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("data/grading");

    tadist()
        .arg("--store")
        .arg(&store)
        .arg("init")
        .assert()
        .success();

    assert!(store.join("config.toml").exists());

    tadist()
        .arg("--store")
        .arg(&store)
        .arg("tas")
        .assert()
        .success();
}

#[test]
fn test_store_discovered_from_subdirectory() {
    let dir = tempdir().unwrap();
    tadist_in(dir.path()).arg("init").assert().success();

    let nested = dir.path().join("submissions/hw1");
    fs::create_dir_all(&nested).unwrap();

    tadist_in(&nested)
        .args(["student", "add", "s1"])
        .assert()
        .success();
}

#[test]
fn test_missing_store_is_data_error() {
    let dir = tempdir().unwrap();

    tadist_in(dir.path())
        .arg("tas")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("store not found"));
}

#[test]
fn test_no_command_prints_version() {
    tadist()
        .assert()
        .success()
        .stdout(predicate::str::contains("tadist"));
}
