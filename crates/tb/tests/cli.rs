//! End-to-end tests for the tb binary.
//!
//! Every test runs the binary in a sandbox: config, data, and task files live
//! in a temporary directory and colors are off.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use serial_test::serial;
use tempfile::TempDir;

const TASKS: &str = r#"{
  "tasks": [
    {"name": "Hello World", "priority": 2, "tags": ["CS2103", "CS2101"]},
    {"name": "Submit report", "deadline": "1/10/2018", "priority": 1, "tags": ["CS2101"]},
    {"name": "Water plants", "frequency": 3, "tags": ["home"]},
    {"name": "Prepare slides", "deadline": "15/9/2018", "priority": 4,
     "tags": ["CS2103", "CS2101", "presentation"], "attachments": ["slides/draft.pptx"]},
    {"name": "Say hello to grandma", "deadline": "20/12/2018"}
  ]
}"#;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temporary sandbox");
        fs::write(dir.path().join("tasks.json"), TASKS).expect("failed to write task file");
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn config_path(&self) -> PathBuf {
        self.path("config.toml")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tb"));
        cmd.env("TB_CONFIG", self.config_path());
        cmd.env("XDG_CONFIG_HOME", self.path("xdg-config"));
        cmd.env("XDG_DATA_HOME", self.path("xdg-data"));
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("TB_TASKS");
        cmd.env_remove("TB_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command()
            .arg("--tasks")
            .arg(self.path("tasks.json"))
            .args(args)
            .output()
            .expect("failed to run tb")
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut full = vec!["--json"];
        full.extend_from_slice(args);
        let output = self.run(&full);
        assert!(
            output.status.success(),
            "tb failed\nargs: {:?}\nstderr:\n{}",
            args,
            stderr(&output)
        );
        serde_json::from_slice(&output.stdout).expect("stdout was not valid JSON")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn names(value: &Value) -> Vec<String> {
    value["tasks"]
        .as_array()
        .expect("tasks array")
        .iter()
        .map(|t| t["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

// ==================== find ====================

#[test]
fn test_find_by_name_json() {
    let sandbox = Sandbox::new();
    let value = sandbox.run_json(&["find", "n:hello"]);

    assert_eq!(names(&value), vec!["Hello World", "Say hello to grandma"]);
    assert_eq!(value["total"], 5);
    assert_eq!(value["matched"], 2);
}

#[test]
fn test_find_joins_words_into_one_expression() {
    let sandbox = Sandbox::new();
    let value = sandbox.run_json(&["find", "t:CS2101", "&&", "!p>3"]);
    assert_eq!(names(&value), vec!["Hello World", "Submit report"]);
}

#[test]
fn test_find_with_brackets_and_or() {
    let sandbox = Sandbox::new();
    let value = sandbox.run_json(&["find", "(n:water || d:15/9/2018) && !t:presentation"]);
    assert_eq!(names(&value), vec!["Water plants"]);
}

#[test]
fn test_find_limit_keeps_matched_count() {
    let sandbox = Sandbox::new();
    let value = sandbox.run_json(&["find", "--limit", "1", "t:CS2101"]);

    assert_eq!(names(&value), vec!["Hello World"]);
    assert_eq!(value["matched"], 3);
}

#[test]
fn test_find_count() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["find", "--count", "t:CS2103"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "2");

    let value = sandbox.run_json(&["find", "--count", "t:CS2103"]);
    assert_eq!(value, serde_json::json!({"total": 5, "matched": 2}));
}

#[test]
fn test_find_table_output() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["f", "a:slides/draft.pptx"]);
    let out = stdout(&output);

    assert!(output.status.success());
    assert!(out.starts_with("Pri"));
    assert!(out.contains("Prepare slides"));
    assert!(!out.contains("\u{1b}["));
}

#[test]
fn test_find_nothing_matches() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["find", "n:nonexistent"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "No tasks found.\n");
}

// ==================== errors ====================

#[test]
fn test_filter_error_exit_code_and_caret() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["find", "n:a && x:b"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    let lines: Vec<&str> = err.lines().collect();
    assert!(lines[0].starts_with("error: invalid filter key"));
    assert_eq!(lines[1], "  n:a && x:b");
    assert_eq!(lines[2], "         ^");
}

#[test]
fn test_filter_error_json() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["--json", "check", "(n:a"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    let value: Value = serde_json::from_slice(&output.stderr).expect("stderr JSON");
    assert_eq!(value["error"]["code"], "MISMATCHED_LEFT_BRACKET");
    assert_eq!(value["error"]["span"]["start"], 0);
    assert_eq!(value["error"]["span"]["end"], 1);
}

#[test]
fn test_bad_expression_reported_before_missing_file() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .command()
        .args(["--tasks", "/nonexistent/tasks.json", "find", "p:9"])
        .output()
        .expect("failed to run tb");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_missing_explicit_task_file_is_store_error() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .command()
        .args(["--json", "--tasks"])
        .arg(sandbox.path("missing.json"))
        .args(["find", "n:a"])
        .output()
        .expect("failed to run tb");

    assert_eq!(output.status.code(), Some(5));
    let value: Value = serde_json::from_slice(&output.stderr).expect("stderr JSON");
    assert_eq!(value["error"]["code"], "STORE_ERROR");
}

#[test]
fn test_missing_default_task_file_is_empty() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .command()
        .args(["--json", "find", "n:a"])
        .output()
        .expect("failed to run tb");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: Value = serde_json::from_slice(&output.stdout).expect("stdout JSON");
    assert_eq!(value["total"], 0);
}

#[test]
fn test_tasks_env_var() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .command()
        .env("TB_TASKS", sandbox.path("tasks.json"))
        .args(["find", "--count", "n:hello"])
        .output()
        .expect("failed to run tb");
    assert_eq!(stdout(&output).trim(), "2");
}

// ==================== check ====================

#[test]
fn test_check_ok() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["check", "t<\"CS2103,CS2101\""]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "ok");

    let value = sandbox.run_json(&["check", "n:a"]);
    assert_eq!(value["valid"], true);
    assert_eq!(value["expression"], "n:a");
}

// ==================== config ====================

#[test]
#[serial]
fn test_config_init_then_path_and_show() {
    let sandbox = Sandbox::new();
    let config_path = sandbox.config_path();
    assert!(!config_path.exists());

    let value = sandbox.run_json(&["config", "init"]);
    assert_eq!(value["status"], "created");
    assert!(config_path.exists());

    let value = sandbox.run_json(&["config", "init"]);
    assert_eq!(value["status"], "exists");

    let value = sandbox.run_json(&["config", "path"]);
    assert_eq!(value["path"], config_path.display().to_string());
    assert_eq!(value["exists"], true);

    let value = sandbox.run_json(&["config", "show"]);
    assert_eq!(value["config"]["version"], 1);
}

#[test]
#[serial]
fn test_config_tasks_path_is_used() {
    let sandbox = Sandbox::new();
    write_config(
        &sandbox.config_path(),
        &format!("tasks = {:?}\n", sandbox.path("tasks.json").display().to_string()),
    );

    let output = sandbox
        .command()
        .args(["find", "--count", "t:home"])
        .output()
        .expect("failed to run tb");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "1");
}

#[test]
#[serial]
fn test_broken_config_exit_code() {
    let sandbox = Sandbox::new();
    write_config(&sandbox.config_path(), "version = \n");

    let output = sandbox.run(&["find", "n:a"]);
    assert_eq!(output.status.code(), Some(5));

    // Commands that do not read the config still work.
    let output = sandbox.run(&["check", "n:a"]);
    assert!(output.status.success());
}

fn write_config(path: &Path, content: &str) {
    fs::write(path, content).expect("failed to write config");
}

// ==================== completions ====================

#[test]
fn test_completions_bash() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("tb"));
}
