//! Integration tests for ipagg.
//!
//! These run the compiled binary end to end.

use std::path::PathBuf;
use std::process::Command;

/// Helper to get the path to the compiled binary
fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ipagg"))
}

/// Run ipagg with a config path that does not exist, so defaults apply
fn run_ipagg(args: &[&str]) -> std::process::Output {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("missing.yaml");
    Command::new(get_binary_path())
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .expect("Failed to execute ipagg")
}

#[test]
fn test_version_command() {
    let output = run_ipagg(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ipagg"));
}

#[test]
fn test_help_command() {
    let output = run_ipagg(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("aggregate"));
    assert!(stdout.contains("reduce"));
    assert!(stdout.contains("categorize"));
}

#[test]
fn test_reduce_command() {
    let output = run_ipagg(&["reduce", "10.0.0.0/24", "10.0.0.5", "example-user"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["10.0.0.0/24", "example-user"]);
}

#[test]
fn test_categorize_json() {
    let output = run_ipagg(&[
        "categorize",
        "--format",
        "json",
        "10.0.0.0/24",
        "10.0.1.0/24",
        "~2024-5",
        "alice",
    ]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["users"], serde_json::json!(["alice"]));
    assert_eq!(value["temporary_users"], serde_json::json!(["~2024-5"]));
    let entries = value["ip_entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    for entry in entries {
        assert!(entry["covers"].as_array().unwrap().is_empty());
        assert!(entry["covered_by"].as_array().unwrap().is_empty());
    }
}

#[test]
fn test_aggregate_json() {
    let dir = tempfile::tempdir().unwrap();
    let records = dir.path().join("records.json");
    std::fs::write(
        &records,
        r#"[
            {"ip": "10.0.0.1", "users": ["alice"], "action_count": 1, "all_action_count": 1},
            {"ip": "10.0.0.2", "users": ["bob"], "action_count": 2, "all_action_count": 2},
            {"ip": "10.0.0.3", "users": ["alice"], "action_count": 3, "all_action_count": 3},
            {"ip": "10.0.0.4", "users": ["carol"], "action_count": 4, "all_action_count": 4}
        ]"#,
    )
    .unwrap();

    let output = run_ipagg(&[
        "aggregate",
        records.to_str().unwrap(),
        "--format",
        "json",
        "--top",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let top = &value[0]["ranges"][0];
    assert_eq!(top["range"], "10.0.0.0/29");
    assert_eq!(top["action_count"], 10);
    assert_eq!(top["covered"], serde_json::json!([0, 1, 2, 3]));
}

#[test]
fn test_aggregate_rejects_mixed_versions() {
    let dir = tempfile::tempdir().unwrap();
    let records = dir.path().join("records.yaml");
    std::fs::write(&records, "- ip: 10.0.0.1\n- ip: 2001:db8::1\n").unwrap();

    let output = run_ipagg(&["aggregate", records.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Mixed IP versions"));
}

#[test]
fn test_aggregate_missing_file() {
    let output = run_ipagg(&["aggregate", "/nonexistent/records.json"]);
    assert!(!output.status.success());
}

#[test]
fn test_init_writes_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("ipagg.yaml");
    let output = Command::new(get_binary_path())
        .arg("--config")
        .arg(&config)
        .arg("init")
        .output()
        .expect("Failed to execute ipagg");
    assert!(output.status.success());
    assert!(config.exists());

    let again = Command::new(get_binary_path())
        .arg("--config")
        .arg(&config)
        .arg("init")
        .output()
        .expect("Failed to execute ipagg");
    assert!(!again.status.success());
}
