use crate::cli::support::{assigned, json_output, setup_course, tadist_in, unassigned};
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn counts(plan: &serde_json::Value, grader: &str) -> usize {
    plan["parts"][0]["distribution"][grader]
        .as_array()
        .map(Vec::len)
        .unwrap_or(0)
}

fn setup_project(dir: &Path) {
    setup_course(dir, 4);
    for (name, a, b) in [("Team A", "s1", "s2"), ("Team B", "s3", "s4")] {
        tadist_in(dir)
            .args(["group", "add", "proj", name, a, b])
            .assert()
            .success();
    }
    tadist_in(dir)
        .args(["blacklist", "add", "alice", "s1"])
        .assert()
        .success();
}

#[test]
fn test_distribute_uses_default_graders() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 10);

    let plan = json_output(tadist_in(dir.path()).args(["distribute", "hw1", "--seed", "1"]));

    assert_eq!(plan["status"], "committed");
    // quiz is not distributable
    assert_eq!(plan["parts"].as_array().unwrap().len(), 1);
    assert_eq!(plan["parts"][0]["part"], "hw1.code");
    assert_eq!(counts(&plan, "alice"), 5);
    assert_eq!(counts(&plan, "bob"), 5);
    assert_eq!(counts(&plan, "carol"), 0);

    assert_eq!(assigned(dir.path(), "hw1", "code", "alice").len(), 5);
    assert!(unassigned(dir.path(), "hw1", "code").is_empty());
}

#[test]
fn test_distribute_is_reproducible_with_seed() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    for dir in [first.path(), second.path()] {
        setup_course(dir, 9);
        tadist_in(dir)
            .args([
                "distribute", "hw1", "--seed", "42", "--ta", "alice", "--ta", "bob", "--ta",
                "carol",
            ])
            .assert()
            .success();
    }

    for grader in ["alice", "bob", "carol"] {
        let a = assigned(first.path(), "hw1", "code", grader);
        assert_eq!(a.len(), 3);
        assert_eq!(a, assigned(second.path(), "hw1", "code", grader));
    }
}

#[test]
fn test_distribute_with_offsets() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 10);

    let plan = json_output(tadist_in(dir.path()).args([
        "distribute", "hw1", "--seed", "3", "--ta", "alice:+2", "--ta", "bob",
    ]));

    let alice = counts(&plan, "alice");
    let bob = counts(&plan, "bob");
    assert_eq!(alice + bob, 10);
    assert!(alice >= bob);
}

#[test]
fn test_existing_distribution_needs_confirmation() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 4);

    tadist_in(dir.path())
        .args(["distribute", "hw1", "--seed", "1"])
        .assert()
        .success();
    let before = assigned(dir.path(), "hw1", "code", "alice");

    tadist_in(dir.path())
        .args(["distribute", "hw1", "--seed", "2", "--ta", "carol"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));
    assert_eq!(assigned(dir.path(), "hw1", "code", "alice"), before);

    let plan = json_output(tadist_in(dir.path()).args([
        "distribute", "hw1", "--seed", "2", "--ta", "carol", "--yes",
    ]));
    assert_eq!(plan["status"], "committed");
    assert_eq!(assigned(dir.path(), "hw1", "code", "carol").len(), 4);
    assert!(assigned(dir.path(), "hw1", "code", "alice").is_empty());
}

#[test]
fn test_partial_distribution_is_discarded_by_default() {
    let dir = tempdir().unwrap();
    setup_project(dir.path());

    let plan = json_output(tadist_in(dir.path()).args([
        "distribute", "proj", "--seed", "5", "--ta", "alice",
    ]));

    assert_eq!(plan["status"], "discarded");
    assert_eq!(plan["parts"][0]["undistributed"][0]["name"], "Team A");
    assert_eq!(unassigned(dir.path(), "proj", "design").len(), 2);
}

#[test]
fn test_partial_distribution_can_be_accepted() {
    let dir = tempdir().unwrap();
    setup_project(dir.path());

    let plan = json_output(tadist_in(dir.path()).args([
        "distribute",
        "proj",
        "--seed",
        "5",
        "--ta",
        "alice",
        "--accept-partial",
    ]));

    assert_eq!(plan["status"], "committed");
    assert_eq!(assigned(dir.path(), "proj", "design", "alice"), vec!["Team B"]);
    assert_eq!(unassigned(dir.path(), "proj", "design"), vec!["Team A"]);
}

#[test]
fn test_unknown_ta_is_config_error() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 2);

    tadist_in(dir.path())
        .args(["distribute", "hw1", "--ta", "zed"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("unknown grader: zed"));
}

#[test]
fn test_part_without_graders_is_config_error() {
    let dir = tempdir().unwrap();
    setup_project(dir.path());

    // Only alice may grade proj.design
    tadist_in(dir.path())
        .args(["distribute", "proj", "--ta", "bob", "--format", "json"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("part_without_graders"));
}

#[test]
fn test_unknown_assignment() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 2);

    tadist_in(dir.path())
        .args(["distribute", "hw9"])
        .assert()
        .code(3);
}

#[test]
fn test_bad_offset_is_usage_error() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 2);

    tadist_in(dir.path())
        .args(["distribute", "hw1", "--ta", "alice:lots"])
        .assert()
        .code(2);
}

#[test]
fn test_show_flags_blacklist_added_after_distribution() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 4);
    tadist_in(dir.path())
        .args(["distribute", "hw1", "--seed", "1", "--ta", "alice"])
        .assert()
        .success();

    tadist_in(dir.path())
        .args(["blacklist", "add", "alice", "s2"])
        .assert()
        .success();

    let shown = json_output(tadist_in(dir.path()).args(["show", "hw1"]));
    let groups = shown[0]["graders"]["alice"].as_array().unwrap();
    let flagged: Vec<_> = groups
        .iter()
        .filter(|g| g.get("conflicts").is_some())
        .collect();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0]["name"], "s2");
    assert_eq!(flagged[0]["conflicts"], serde_json::json!(["s2"]));

    tadist_in(dir.path())
        .args(["show", "hw1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("! blacklisted: s2"));
}

#[test]
fn test_distribution_records_in_database() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 6);

    tadist_in(dir.path())
        .args(["distribute", "hw1", "--seed", "3"])
        .assert()
        .success();

    let conn = rusqlite::Connection::open(dir.path().join(".tadist/tadist.db")).unwrap();
    let mode: String = conn
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode, "wal");

    let rows: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM distribution WHERE part = 'hw1.code'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(rows, 6);

    // quiz is not distributable
    let quiz: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM distribution WHERE part = 'hw1.quiz'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(quiz, 0);
}

#[test]
fn test_huge_offset_takes_everything_it_can() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 4);

    let plan = json_output(tadist_in(dir.path()).args([
        "distribute",
        "hw1",
        "--seed",
        "2",
        "--ta",
        "alice:9223372036854775807",
        "--ta",
        "bob",
    ]));
    assert_eq!(plan["status"], "committed");
    assert_eq!(counts(&plan, "alice") + counts(&plan, "bob"), 4);
}
