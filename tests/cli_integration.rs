//! CLI integration tests
//!
//! Exercises argument handling of the `disguise` binary. Requests that would
//! leave the machine are pointed at an unused local port.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the caller's environment and config directory
fn disguise(config_dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("disguise");
    cmd.env_clear()
        .env("HOME", config_dir.path())
        .env("XDG_CONFIG_HOME", config_dir.path())
        .env("DISGUISE_BASE_URL", "http://127.0.0.1:1");
    cmd
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    let mut cmd = disguise(&dir);
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    let dir = TempDir::new().unwrap();
    let mut cmd = disguise(&dir);
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--path"))
        .stdout(predicate::str::contains("--method"))
        .stdout(predicate::str::contains("--header"))
        .stdout(predicate::str::contains("--registering"));
}

#[test]
fn test_path_is_required() {
    let dir = TempDir::new().unwrap();
    let mut cmd = disguise(&dir);

    cmd.assert().failure().stderr(predicate::str::contains("--path"));
}

#[test]
fn test_array_body_rejected_for_post() {
    let dir = TempDir::new().unwrap();
    let mut cmd = disguise(&dir);
    cmd.args(["--path", "channels/1/messages", "--method", "post", "--body", "[1, 2]"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid body"));
}

#[test]
fn test_malformed_body_rejected() {
    let dir = TempDir::new().unwrap();
    let mut cmd = disguise(&dir);
    cmd.args(["--path", "users/@me/settings", "--method", "patch", "--body", "{oops"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn test_bad_header_rejected() {
    let dir = TempDir::new().unwrap();
    let mut cmd = disguise(&dir);
    cmd.args(["--path", "users/@me", "--header", "no-separator"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("NAME:VALUE"));
}

#[test]
fn test_unknown_method_rejected() {
    let dir = TempDir::new().unwrap();
    let mut cmd = disguise(&dir);
    cmd.args(["--path", "users/@me", "--method", "delete"]);

    cmd.assert().failure();
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[server]\nport = 1\n").unwrap();

    let mut cmd = disguise(&dir);
    cmd.arg("--config").arg(&config).args(["--path", "users/@me"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_bootstrap_failure_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let mut cmd = disguise(&dir);
    cmd.args(["--path", "users/@me"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Cookie derivation failed"));
}
