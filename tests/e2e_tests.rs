//! End-to-End tests for the Ocular Rest binary.
//!
//! These tests run the compiled CLI:
//! - Help, version and completions
//! - Argument validation
//! - Error output when no daemon is running
//! - A real daemon driven by CLI commands

use std::path::Path;
use std::process::{Child, Stdio};
use std::time::{Duration, Instant};

use assert_cmd::Command;
use predicates::prelude::*;

use ocular_rest::config::{API_KEY_ENV_VARS, SOCKET_FILE_NAME};

// ============================================================================
// Test Helpers
// ============================================================================

fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ocular-rest").unwrap();
    cmd.arg("--data-dir").arg(data_dir);
    cmd
}

/// Kills the daemon when the test ends, pass or fail.
struct DaemonGuard(Child);

impl Drop for DaemonGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

/// Starts a daemon without sound, notifications or network tips.
fn spawn_daemon(data_dir: &Path) -> DaemonGuard {
    let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin("ocular-rest"));
    cmd.arg("--data-dir")
        .arg(data_dir)
        .args(["daemon", "--no-sound", "--no-notify"])
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    for var in API_KEY_ENV_VARS {
        cmd.env_remove(var);
    }

    // A killed daemon leaves its socket behind.
    let socket = data_dir.join(SOCKET_FILE_NAME);
    let _ = std::fs::remove_file(&socket);

    let guard = DaemonGuard(cmd.spawn().unwrap());

    let started = Instant::now();
    while !socket.exists() {
        assert!(
            started.elapsed() < Duration::from_secs(10),
            "daemon did not create its socket"
        );
        std::thread::sleep(Duration::from_millis(50));
    }
    guard
}

// ============================================================================
// Static commands
// ============================================================================

#[test]
fn test_help() {
    Command::cargo_bin("ocular-rest")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Eye-rest reminder"))
        .stdout(predicate::str::contains("daemon"));
}

#[test]
fn test_version() {
    Command::cargo_bin("ocular-rest")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions_bash() {
    Command::cargo_bin("ocular-rest")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ocular-rest"));
}

#[test]
fn test_set_rejects_out_of_range_work() {
    let dir = tempfile::tempdir().unwrap();
    cli(dir.path())
        .args(["set", "--work", "90"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("90"));
}

#[test]
fn test_set_without_flags() {
    let dir = tempfile::tempdir().unwrap();
    cli(dir.path())
        .arg("set")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to change"));
}

#[test]
fn test_status_without_daemon() {
    let dir = tempfile::tempdir().unwrap();
    cli(dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot reach the daemon"));
}

// ============================================================================
// Running daemon
// ============================================================================

#[test]
fn test_daemon_session() {
    let dir = tempfile::tempdir().unwrap();
    let _daemon = spawn_daemon(dir.path());

    cli(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Paused    20:00"));

    cli(dir.path())
        .arg("start")
        .assert()
        .success()
        .stdout(predicate::str::contains("Focus session started"));

    cli(dir.path())
        .arg("start")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Timer is already running"));

    cli(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Focusing"));

    cli(dir.path())
        .args(["set", "--break", "30", "--mute"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rest:   30s"))
        .stdout(predicate::str::contains("Muted:  yes"));

    cli(dir.path())
        .arg("pause")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timer paused"));

    cli(dir.path())
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Paused    20:00"));
}

#[test]
fn test_daemon_persists_settings_and_session() {
    let dir = tempfile::tempdir().unwrap();

    {
        let _daemon = spawn_daemon(dir.path());
        cli(dir.path()).args(["set", "--work", "5"]).assert().success();
        cli(dir.path()).arg("start").assert().success();
    }

    let settings: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("settings.json")).unwrap()).unwrap();
    assert_eq!(settings["workDuration"], 300);
    let session: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("session.json")).unwrap()).unwrap();
    assert_eq!(session["phase"], "WORKING");
    assert!(session["endTime"].is_i64());

    // A new daemon picks the running interval back up.
    let _daemon = spawn_daemon(dir.path());
    cli(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Focusing"));
}
