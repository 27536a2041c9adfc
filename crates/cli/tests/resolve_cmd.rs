//! CLI integration tests: resolve/tokenize/list/explain commands, the JSON
//! output contract, catalog file loading, and the stdin REPL.

use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

use assert_cmd::cargo;

fn conch_cmd() -> Command {
    Command::new(cargo::cargo_bin!("conch"))
}

fn write_temp_catalog(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("catalog.json");
    fs::write(&path, content).expect("write temp catalog");
    (dir, path.to_string_lossy().to_string())
}

const CUSTOM_CATALOG: &str = r#"[
    {
        "key": "greet",
        "representations": ["greet", "hello"],
        "parameters": [{ "key": "who", "template": "[A-Za-z]+" }]
    }
]"#;

// ─── resolve ─────────────────────────────────────────────────────────────────

#[test]
fn resolve_valid_input_json_envelope() {
    let output = conch_cmd()
        .args(["--output", "json", "resolve", "cd", "/tmp"])
        .output()
        .expect("run resolve");
    assert!(output.status.success(), "valid input should exit 0");

    let v: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is one JSON envelope");
    assert_eq!(v["context"]["isValid"], true);
    assert_eq!(v["context"]["key"], "current-directory");
    assert_eq!(v["context"]["queryPath"][0], "current-directory");
    assert_eq!(v["tokens"][0]["sem"], "query");
    assert_eq!(v["tokens"][1]["sem"], "parameter");
    assert_eq!(v["diagnostics"].as_array().unwrap().len(), 0);
}

#[test]
fn resolve_invalid_input_exits_nonzero_with_diagnostics() {
    let output = conch_cmd()
        .args(["--output", "json", "resolve", "frobnicate"])
        .output()
        .expect("run resolve");
    assert!(!output.status.success(), "invalid input should exit 1");

    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON envelope");
    assert_eq!(v["context"]["isValid"], false);
    assert_eq!(v["diagnostics"][0]["id"], "CSH0201");
}

#[test]
fn resolve_default_query_descent() {
    let output = conch_cmd()
        .args(["--output", "json", "resolve", "sh", "env", "--names-only"])
        .output()
        .expect("run resolve");
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON envelope");
    let path: Vec<&str> = v["context"]["queryPath"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap())
        .collect();
    assert_eq!(path, ["shell", "environment", "list"]);
    assert!(output.status.success(), "default descent resolves validly");
}

#[test]
fn resolve_with_custom_catalog_file() {
    let (_dir, path) = write_temp_catalog(CUSTOM_CATALOG);
    let output = conch_cmd()
        .args([
            "--output",
            "json",
            "--catalog",
            &path,
            "resolve",
            "hello",
            "World",
        ])
        .output()
        .expect("run resolve");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON envelope");
    assert_eq!(v["context"]["key"], "greet");
    assert_eq!(v["context"]["parameters"]["who"]["values"][0], "World");
}

#[test]
fn broken_catalog_file_is_a_startup_error() {
    let (_dir, path) = write_temp_catalog(r#"[{ "key": "", "representations": ["x"] }]"#);
    let output = conch_cmd()
        .args(["--catalog", &path, "resolve", "x"])
        .output()
        .expect("run resolve");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid catalog definitions"),
        "stderr: {stderr}"
    );
}

// ─── tokenize ────────────────────────────────────────────────────────────────

#[test]
fn tokenize_reports_lexical_kinds_and_offsets() {
    let output = conch_cmd()
        .args(["tokenize", "stat", "-ab", "--name", "-"])
        .output()
        .expect("run tokenize");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON array");
    let kinds: Vec<&str> = v
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["lex"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, ["word", "shortBundle", "longOption", "wrong"]);
    assert_eq!(v[0]["start"], 0);
    assert_eq!(v[0]["end"], 4);
}

// ─── list ────────────────────────────────────────────────────────────────────

#[test]
fn list_prints_builtin_tree_with_default_marker() {
    let output = conch_cmd().arg("list").output().expect("run list");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("current-directory"), "stdout: {stdout}");
    assert!(stdout.contains("environment"), "stdout: {stdout}");
    assert!(stdout.contains("(default: list)"), "stdout: {stdout}");
}

// ─── repl ────────────────────────────────────────────────────────────────────

#[test]
fn repl_resolves_each_stdin_line() {
    let mut child = conch_cmd()
        .args(["--output", "json", "repl"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn repl");
    {
        let stdin = child.stdin.as_mut().expect("stdin handle");
        stdin
            .write_all(b"help\n\ncd /tmp\n")
            .expect("write stdin body");
    }
    let output = child.wait_with_output().expect("wait for repl");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    // Two non-empty lines, two JSON envelopes.
    assert_eq!(stdout.matches("\"queryPath\"").count(), 2, "{stdout}");
}

// ─── explain ─────────────────────────────────────────────────────────────────

#[test]
fn explain_known_code() {
    let output = conch_cmd()
        .args(["explain", "CSH0202"])
        .output()
        .expect("run explain");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("CSH0202:"), "stdout: {stdout}");
}

#[test]
fn explain_unknown_code_fails() {
    let output = conch_cmd()
        .args(["explain", "CSH9999"])
        .output()
        .expect("run explain");
    assert!(!output.status.success());
}
