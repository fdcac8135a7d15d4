//! CLI integration tests
//!
//! These run the `bt-inquiry` binary for commands that need no Bluetooth
//! hardware.

use std::process::{Command, Output};

fn run_bt_inquiry(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bt-inquiry"))
        .args(args)
        .output()
        .expect("Failed to run bt-inquiry binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help() {
    let output = run_bt_inquiry(&["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("run"));
    assert!(text.contains("decode"));
    assert!(text.contains("--interval"));
}

#[test]
fn test_version() {
    let output = run_bt_inquiry(&["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("bt-inquiry "));
}

// =============================================================================
// Decode Tests
// =============================================================================

#[test]
fn test_decode_audio_video() {
    let output = run_bt_inquiry(&["decode", "0x240418"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        r#"{"Major Service Class":"Network, Object Transfer","Major Device Class":"Audio/Video","Minor Device Class":"Uncategorized"}"#
    );
}

#[test]
fn test_decode_without_prefix() {
    let output = run_bt_inquiry(&["decode", "000104"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(json["Major Service Class"], "None");
    assert_eq!(json["Major Device Class"], "Computer");
    assert_eq!(json["Minor Device Class"], "Desktop Workstation");
}

#[test]
fn test_decode_pretty() {
    let output = run_bt_inquiry(&["decode", "--pretty", "0x0"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("\n  \"Major Device Class\": \"Unknown\""));
}

#[test]
fn test_decode_invalid_hex_fails() {
    let output = run_bt_inquiry(&["decode", "zz"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("zz"));
}

#[test]
fn test_decode_empty_fails() {
    let output = run_bt_inquiry(&["decode", "0x"]);
    assert!(!output.status.success());
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
fn test_run_rejects_invalid_config_before_touching_bluetooth() {
    let temp = tempfile::tempdir().unwrap();
    let config_path = temp.path().join("config.toml");
    std::fs::write(
        &config_path,
        "[discovery]\ninterval_secs = 0\n\n[logging]\nmax_file_size_mb = 0\n",
    )
    .unwrap();

    let output = run_bt_inquiry(&["--config", config_path.to_str().unwrap(), "run"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("discovery.interval_secs"));
    assert!(stderr.contains("logging.max_file_size_mb"));
}

#[test]
fn test_run_rejects_missing_config_file() {
    let output = run_bt_inquiry(&["--config", "/nonexistent/bt-inquiry.toml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read config file"));
}

#[test]
fn test_interval_flag_is_validated() {
    let temp = tempfile::tempdir().unwrap();
    let config_path = temp.path().join("config.toml");
    std::fs::write(&config_path, "").unwrap();

    let output = run_bt_inquiry(&[
        "--config",
        config_path.to_str().unwrap(),
        "--interval",
        "0",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("discovery.interval_secs"));
}
