use crate::cli::support::{json_output, setup_course, tadist_in};
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_tas_lists_config() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 0);

    let tas = json_output(tadist_in(dir.path()).arg("tas"));
    let logins: Vec<_> = tas
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["login"].as_str().unwrap())
        .collect();
    assert_eq!(logins, vec!["alice", "bob", "carol"]);
    assert_eq!(tas[2]["default_grader"], false);
}

#[test]
fn test_student_add_list_disable() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 3);

    tadist_in(dir.path())
        .args(["student", "disable", "s2"])
        .assert()
        .success();

    let students = json_output(tadist_in(dir.path()).args(["student", "list"]));
    let students = students.as_array().unwrap();
    assert_eq!(students.len(), 3);
    assert_eq!(students[0]["name"], "Student 1");
    assert_eq!(students[1]["enabled"], false);

    tadist_in(dir.path())
        .args(["student", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(disabled)"));
}

#[test]
fn test_duplicate_student_is_data_error() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 1);

    tadist_in(dir.path())
        .args(["student", "add", "s1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_disabled_students_get_no_singleton_group() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 3);

    tadist_in(dir.path())
        .args(["student", "disable", "s3"])
        .assert()
        .success();

    let groups = json_output(tadist_in(dir.path()).args(["group", "list", "hw1"]));
    let names: Vec<_> = groups
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["s1", "s2"]);
}

#[test]
fn test_group_add_and_list() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 4);

    tadist_in(dir.path())
        .args(["group", "add", "proj", "Team A", "s1", "s2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added group Team A"));

    tadist_in(dir.path())
        .args(["group", "add", "proj", "Team B", "s3", "s4"])
        .assert()
        .success();

    let groups = json_output(tadist_in(dir.path()).args(["group", "list", "proj"]));
    let groups = groups.as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["name"], "Team A");
    assert_eq!(groups[0]["members"], serde_json::json!(["s1", "s2"]));
}

#[test]
fn test_group_validation() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 3);

    tadist_in(dir.path())
        .args(["group", "add", "proj", "Team A", "s1", "s2"])
        .assert()
        .success();

    // s2 already has a group on proj
    tadist_in(dir.path())
        .args(["group", "add", "proj", "Team B", "s2", "s3"])
        .assert()
        .code(3);

    tadist_in(dir.path())
        .args(["group", "add", "proj", "Team C", "nobody"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("student not found"));

    tadist_in(dir.path())
        .args(["group", "add", "hw9", "Team D", "s3"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("assignment not found"));

    // Missing members is a usage error
    tadist_in(dir.path())
        .args(["group", "add", "proj", "Team E"])
        .assert()
        .code(2);
}

#[test]
fn test_blacklist_add_list_remove() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 2);

    tadist_in(dir.path())
        .args(["blacklist", "add", "alice", "s1"])
        .assert()
        .success();
    tadist_in(dir.path())
        .args(["blacklist", "add", "bob", "s2"])
        .assert()
        .success();

    let entries = json_output(tadist_in(dir.path()).args(["blacklist", "list", "--ta", "alice"]));
    assert_eq!(entries, serde_json::json!([{ "ta": "alice", "student": "s1" }]));

    tadist_in(dir.path())
        .args(["blacklist", "remove", "alice", "s1"])
        .assert()
        .success();

    tadist_in(dir.path())
        .args(["blacklist", "remove", "alice", "s1"])
        .assert()
        .code(3);

    let entries = json_output(tadist_in(dir.path()).args(["blacklist", "list"]));
    assert_eq!(entries.as_array().unwrap().len(), 1);
}

#[test]
fn test_blacklist_unknown_ta_is_config_error() {
    let dir = tempdir().unwrap();
    setup_course(dir.path(), 1);

    tadist_in(dir.path())
        .args(["blacklist", "add", "zed", "s1"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("unknown grader: zed"));
}
