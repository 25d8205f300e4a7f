use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{tempdir, TempDir};

/// `mesh` running in an empty project directory with no env overrides.
fn mesh(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mesh").expect("Failed to find mesh binary");
    cmd.current_dir(dir.path())
        .env_remove("MESH_DIRECTORY_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = tempdir().expect("Failed to create temp dir");
    mesh(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("discover"))
        .stdout(predicate::str::contains("bridge"));
}

#[test]
fn test_route_code_action() {
    let dir = tempdir().expect("Failed to create temp dir");
    mesh(&dir)
        .args(["route", "implement a function"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""agent": "code""#))
        .stdout(predicate::str::contains("Code Agent"))
        .stdout(predicate::str::contains("opengoat"));
}

#[test]
fn test_route_default_target() {
    let dir = tempdir().expect("Failed to create temp dir");
    mesh(&dir)
        .args(["route", "summarize this", "{}"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""agent": "researcher""#));
}

#[test]
fn test_route_uses_configured_backend() {
    let dir = tempdir().expect("Failed to create temp dir");
    fs::create_dir_all(dir.path().join(".mesh")).expect("Failed to create .mesh");
    fs::write(
        dir.path().join(".mesh/config.toml"),
        "[bridge]\ncommand = \"my-backend\"\nargs = [\"{agent}\"]\n",
    )
    .expect("Failed to write config");

    mesh(&dir)
        .args(["route", "research", r#"{"query": "rust"}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("my-backend"))
        .stdout(predicate::str::contains(r#""prompt": "rust""#));
}

#[test]
fn test_send_rejects_bad_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    mesh(&dir)
        .args(["send", "echo-agent", "ping", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON"));
}

#[test]
fn test_list_fails_without_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    mesh(&dir)
        .args(["--directory", "http://127.0.0.1:9", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Transport error"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    fs::create_dir_all(dir.path().join(".mesh")).expect("Failed to create .mesh");
    fs::write(dir.path().join(".mesh/config.toml"), "directory_url = [").expect("Failed to write config");

    mesh(&dir)
        .args(["route", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse TOML"));
}
