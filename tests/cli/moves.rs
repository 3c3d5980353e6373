use crate::cli::support::{
    assigned, distribute_hw1, json_output, setup_course, tadist_in, unassigned,
};
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_move_group_between_tas() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 6);
    distribute_hw1(dir.path());

    let group = assigned(dir.path(), "hw1", "code", "alice")[0].clone();

    let report = json_output(tadist_in(dir.path()).args([
        "move", "hw1.code", group.as_str(), "--from", "alice", "--to", "bob",
    ]));
    assert_eq!(report["group"]["name"], group.as_str());
    assert_eq!(report["overridden"], false);

    assert!(assigned(dir.path(), "hw1", "code", "bob").contains(&group));
    assert_eq!(assigned(dir.path(), "hw1", "code", "alice").len(), 2);

    // The group is no longer alice's
    tadist_in(dir.path())
        .args(["move", "hw1.code", group.as_str(), "--from", "alice", "--to", "bob"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("is not assigned to alice"));
}

#[test]
fn test_move_to_and_from_unassigned() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 4);
    distribute_hw1(dir.path());

    let group = assigned(dir.path(), "hw1", "code", "bob")[0].clone();

    tadist_in(dir.path())
        .args(["move", "hw1.code", group.as_str(), "--from", "bob", "--to", "unassigned"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bob -> unassigned"));
    assert_eq!(unassigned(dir.path(), "hw1", "code"), vec![group.clone()]);

    tadist_in(dir.path())
        .args(["move", "hw1.code", group.as_str(), "--from", "unassigned", "--to", "carol"])
        .assert()
        .success();
    assert_eq!(assigned(dir.path(), "hw1", "code", "carol"), vec![group]);
}

#[test]
fn test_move_into_blacklist_is_rejected() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 4);
    distribute_hw1(dir.path());

    let group = assigned(dir.path(), "hw1", "code", "alice")[0].clone();
    // Singleton groups are named after their student
    tadist_in(dir.path())
        .args(["blacklist", "add", "bob", group.as_str()])
        .assert()
        .success();

    tadist_in(dir.path())
        .args(["move", "hw1.code", group.as_str(), "--from", "alice", "--to", "bob"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains(group.as_str()))
        .stderr(predicate::str::contains("bob"));
    assert!(assigned(dir.path(), "hw1", "code", "alice").contains(&group));

    let report = json_output(tadist_in(dir.path()).args([
        "move", "hw1.code", group.as_str(), "--from", "alice", "--to", "bob", "--force",
    ]));
    assert_eq!(report["overridden"], true);
    assert!(assigned(dir.path(), "hw1", "code", "bob").contains(&group));
}

#[test]
fn test_move_blacklist_error_json() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 2);
    tadist_in(dir.path())
        .args(["distribute", "hw1", "--seed", "1", "--ta", "alice"])
        .assert()
        .success();
    tadist_in(dir.path())
        .args(["blacklist", "add", "bob", "s1"])
        .assert()
        .success();

    let output = tadist_in(dir.path())
        .args(["move", "hw1.code", "s1", "--from", "alice", "--to", "bob", "--format", "json"])
        .assert()
        .code(5);
    let error: serde_json::Value = serde_json::from_slice(&output.get_output().stderr).unwrap();
    assert_eq!(error["error"]["type"], "blacklisted");
    assert_eq!(error["error"]["group"], "s1");
    assert_eq!(error["error"]["grader"], "bob");
    assert_eq!(error["error"]["students"], serde_json::json!(["s1"]));
}

#[test]
fn test_move_same_endpoints_is_usage_error() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 2);
    distribute_hw1(dir.path());

    tadist_in(dir.path())
        .args(["move", "hw1.code", "s1", "--from", "alice", "--to", "alice"])
        .assert()
        .code(2);
}

#[test]
fn test_move_unknown_group() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 2);
    distribute_hw1(dir.path());

    tadist_in(dir.path())
        .args(["move", "hw1.code", "nobody", "--from", "alice", "--to", "bob"])
        .assert()
        .code(3);
}

#[test]
fn test_move_random() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 8);
    distribute_hw1(dir.path());

    let moved = json_output(tadist_in(dir.path()).args([
        "move-random", "hw1.code", "3", "--from", "alice", "--to", "bob", "--seed", "9",
    ]));
    assert_eq!(moved.as_array().unwrap().len(), 3);

    assert_eq!(assigned(dir.path(), "hw1", "code", "alice").len(), 1);
    assert_eq!(assigned(dir.path(), "hw1", "code", "bob").len(), 7);
}

#[test]
fn test_move_random_is_all_or_nothing() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 4);
    distribute_hw1(dir.path());

    let alice = assigned(dir.path(), "hw1", "code", "alice");
    // bob refuses one of alice's two groups
    tadist_in(dir.path())
        .args(["blacklist", "add", "bob", alice[0].as_str()])
        .assert()
        .success();

    let output = tadist_in(dir.path())
        .args([
            "move-random", "hw1.code", "2", "--from", "alice", "--to", "bob", "--format", "json",
        ])
        .assert()
        .code(5);
    let error: serde_json::Value = serde_json::from_slice(&output.get_output().stderr).unwrap();
    assert_eq!(error["error"]["requested"], 2);
    assert_eq!(error["error"]["movable"], 1);

    assert_eq!(assigned(dir.path(), "hw1", "code", "alice"), alice);

    tadist_in(dir.path())
        .args(["move-random", "hw1.code", "1", "--from", "alice", "--to", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved 1 group(s)"));
    assert_eq!(assigned(dir.path(), "hw1", "code", "alice"), vec![alice[0].clone()]);
}

#[test]
fn test_move_random_to_unassigned() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 4);
    distribute_hw1(dir.path());

    tadist_in(dir.path())
        .args(["move-random", "hw1.code", "2", "--from", "bob", "--to", "unassigned"])
        .assert()
        .success();

    assert_eq!(unassigned(dir.path(), "hw1", "code").len(), 2);
    assert!(assigned(dir.path(), "hw1", "code", "bob").is_empty());
}
