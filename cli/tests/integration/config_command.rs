//! Integration tests for `runway config`.
//!
//! All filesystem-touching tests set `RUNWAY_CONFIG` to a temp path so they
//! never read or write `~/.runway/config.yaml`.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn runway() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("runway"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("config.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

#[test]
fn test_config_help_shows_show_and_set_subcommands() {
    runway()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"));
}

#[test]
fn test_config_show_without_file_uses_defaults() {
    let (_dir, path) = temp_config_path();
    runway()
        .args(["config", "show"])
        .env("RUNWAY_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("https://api.github.com"))
        .stdout(predicate::str::contains("private"))
        .stdout(predicate::str::contains("RUNWAY_CONFIG"));
}

#[test]
fn test_config_show_does_not_create_file() {
    let (_dir, path) = temp_config_path();
    runway()
        .args(["config", "show"])
        .env("RUNWAY_CONFIG", &path)
        .assert()
        .success();
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_set_visibility_persists() {
    let (_dir, path) = temp_config_path();
    runway()
        .args(["config", "set", "visibility", "public"])
        .env("RUNWAY_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Set visibility = public"));

    let content = std::fs::read_to_string(&path).expect("config written");
    assert!(content.contains("visibility: public"));

    runway()
        .args(["config", "show"])
        .env("RUNWAY_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("public"));
}

#[test]
fn test_config_set_unknown_key_fails() {
    let (_dir, path) = temp_config_path();
    runway()
        .args(["config", "set", "region", "eu"])
        .env("RUNWAY_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting: region"));
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_set_invalid_visibility_fails() {
    let (_dir, path) = temp_config_path();
    runway()
        .args(["config", "set", "visibility", "internal"])
        .env("RUNWAY_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("private, public"));
}

#[test]
fn test_config_show_json_includes_path_and_values() {
    let (_dir, path) = temp_config_path();
    let output = runway()
        .args(["config", "show", "--json"])
        .env("RUNWAY_CONFIG", &path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(value["path"], path.as_str());
    assert_eq!(value["config"]["visibility"], "private");
    assert_eq!(value["config"]["poll"]["attempts"], 60);
}
