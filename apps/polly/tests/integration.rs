//! Integration tests for the polly CLI

use std::process::Command;
use tempfile::tempdir;

fn polly(prefix: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_polly"));
    cmd.env_remove("POLLY_HOME")
        .env_remove("POLLY_LOG_FILE")
        .env_remove("RUST_LOG")
        .arg("--prefix")
        .arg(prefix);
    cmd
}

#[test]
fn test_cli_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_polly"))
        .arg("--version")
        .output()
        .expect("Failed to execute polly");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("polly"));
}

#[test]
fn test_version_banner() {
    let temp = tempdir().unwrap();
    let output = polly(temp.path())
        .arg("version")
        .output()
        .expect("Failed to execute polly");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for label in ["Binary:", "SemVer:", "OsArch:", "Branch:", "Commit:", "Formed:"] {
        assert!(stdout.contains(label), "missing {label} in {stdout}");
    }
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_paths_json_under_prefix() {
    let temp = tempdir().unwrap();
    let output = polly(temp.path())
        .args(["--json", "paths"])
        .output()
        .expect("Failed to execute polly");

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let prefix = temp.path().to_str().unwrap();

    assert_eq!(report["prefix"], prefix);
    let dirs = report["dirs"].as_array().unwrap();
    assert_eq!(dirs.len(), 5);
    for dir in dirs {
        assert!(dir["path"].as_str().unwrap().starts_with(prefix));
        assert!(dir.get("warning").is_none(), "{dir}");
    }
    assert_eq!(
        report["pid_file"],
        format!("{prefix}/var/run/polly/polly.pid")
    );
    assert_eq!(report["unit_file"], "/etc/systemd/system/polly.service");
    assert!(temp.path().join("var/log/polly").is_dir());
}

#[test]
fn test_pid_write_then_read() {
    let temp = tempdir().unwrap();

    let write = polly(temp.path())
        .args(["pid", "write", "--pid", "4242"])
        .output()
        .expect("Failed to execute polly");
    assert!(write.status.success());

    let read = polly(temp.path())
        .args(["pid", "read"])
        .output()
        .expect("Failed to execute polly");
    assert!(read.status.success());
    assert_eq!(String::from_utf8_lossy(&read.stdout).trim(), "4242");
}

#[test]
fn test_pid_read_without_file_fails() {
    let temp = tempdir().unwrap();
    let output = polly(temp.path())
        .args(["pid", "read"])
        .output()
        .expect("Failed to execute polly");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("pid.not_found"), "{stderr}");
}

#[test]
fn test_log_file_receives_output() {
    let temp = tempdir().unwrap();
    let output = polly(temp.path())
        .args(["--log-file", "cli.log", "pid", "write", "--pid", "77"])
        .output()
        .expect("Failed to execute polly");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "77");

    let log = std::fs::read_to_string(temp.path().join("var/log/polly/cli.log")).unwrap();
    assert!(log.contains("77"));
}

#[test]
fn test_invalid_log_file_name() {
    let temp = tempdir().unwrap();
    let output = polly(temp.path())
        .args(["--log-file", "../escape.log", "paths"])
        .output()
        .expect("Failed to execute polly");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Configuration error"));
}

#[test]
fn test_cli_invalid_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_polly"))
        .arg("invalid-command")
        .output()
        .expect("Failed to execute polly");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized subcommand"));
}
