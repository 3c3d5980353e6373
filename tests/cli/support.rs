use assert_cmd::{cargo::cargo_bin_cmd, Command};
use serde_json::Value;
use std::fs;
use std::path::Path;

pub const COURSE_CONFIG: &str = r#"
version = 1
course = "CS 101"
leniency_minutes = 10

[[tas]]
login = "alice"
name = "Alice"

[[tas]]
login = "bob"
name = "Bob"

[[tas]]
login = "carol"
default_grader = false

[[assignments]]
id = "hw1"

[[assignments.parts]]
id = "code"

[[assignments.parts]]
id = "quiz"
distributable = false

[[assignments]]
id = "proj"
group_based = true

[[assignments.parts]]
id = "design"
graders = ["alice"]
"#;

/// Get a Command for tadist
pub fn tadist() -> Command {
    cargo_bin_cmd!("tadist")
}

/// tadist rooted at `dir`
pub fn tadist_in(dir: &Path) -> Command {
    let mut cmd = tadist();
    cmd.current_dir(dir).env_remove("TADIST_STORE");
    cmd
}

/// Init a store in `dir` with the course config and students `s1..sN`
pub fn setup_course(dir: &Path, students: usize) {
    tadist_in(dir).arg("init").assert().success();
    fs::write(dir.join(".tadist/config.toml"), COURSE_CONFIG).unwrap();

    for i in 1..=students {
        let login = format!("s{}", i);
        tadist_in(dir)
            .args(["student", "add", login.as_str(), "--name"])
            .arg(format!("Student {}", i))
            .assert()
            .success();
    }
}

/// Run and parse stdout as JSON, asserting success
pub fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.arg("--format").arg("json").assert().success();
    serde_json::from_slice(&output.get_output().stdout).unwrap()
}

/// Group names per grader for one part, from `show --format json`
pub fn assigned(dir: &Path, assignment: &str, part: &str, grader: &str) -> Vec<String> {
    let shown = json_output(tadist_in(dir).args(["show", assignment, "--part", part]));
    shown[0]["graders"][grader]
        .as_array()
        .map(|groups| {
            groups
                .iter()
                .map(|g| g["name"].as_str().unwrap().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Unassigned group names for one part
pub fn unassigned(dir: &Path, assignment: &str, part: &str) -> Vec<String> {
    let shown = json_output(tadist_in(dir).args(["show", assignment, "--part", part]));
    shown[0]["unassigned"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap().to_string())
        .collect()
}

/// Distribute hw1 between alice and bob with a fixed seed
pub fn distribute_hw1(dir: &Path) {
    tadist_in(dir)
        .args(["distribute", "hw1", "--seed", "7"])
        .assert()
        .success();
}
