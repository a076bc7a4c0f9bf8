//! Integration test: the binary's non-interactive paths

use std::process::Command;

#[test]
fn binary_prints_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_serlog"))
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("0.1.0"),
        "Expected output to contain version '0.1.0', but got: {}",
        stdout
    );
}

#[test]
fn missing_replay_file_fails_before_starting_ui() {
    let log_dir = std::env::temp_dir().join(format!("serlog_version_test_{}", std::process::id()));
    let output = Command::new(env!("CARGO_BIN_EXE_serlog"))
        .args(["--file", "/nonexistent/capture.log"])
        .env("SERLOG_CONFIG", log_dir.join("absent.toml"))
        .env("XDG_STATE_HOME", &log_dir)
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("File not found"),
        "Expected a file-not-found error, got: {}",
        stderr
    );

    let _ = std::fs::remove_dir_all(&log_dir);
}
