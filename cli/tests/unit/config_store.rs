//! Unit tests for the YAML-backed configuration store.
//!
//! These tests mutate `RUNWAY_CONFIG` and are serialized with `serial_test`.

#![allow(clippy::expect_used, unsafe_code)]

use runway_cli::application::ports::ConfigStore;
use runway_cli::infra::config::{CONFIG_ENV, YamlConfigStore};
use runway_core::domain::{ProvisionConfig, Visibility};
use serial_test::serial;
use tempfile::TempDir;

fn point_store_at(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("nested").join("config.yaml");
    // SAFETY: every test touching CONFIG_ENV is #[serial].
    unsafe { std::env::set_var(CONFIG_ENV, &path) };
    path
}

#[test]
#[serial]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().expect("temp dir");
    let path = point_store_at(&dir);

    let config = YamlConfigStore.load().expect("load");

    assert_eq!(config, ProvisionConfig::default());
    assert!(!path.exists());
}

#[test]
#[serial]
fn test_save_then_load_preserves_values() {
    let dir = TempDir::new().expect("temp dir");
    let path = point_store_at(&dir);
    let mut config = ProvisionConfig {
        visibility: Visibility::Public,
        ..ProvisionConfig::default()
    };
    config.poll.interval_secs = 2;

    YamlConfigStore.save(&config).expect("save");

    assert!(path.exists());
    assert_eq!(YamlConfigStore.load().expect("load"), config);
}

#[cfg(unix)]
#[test]
#[serial]
fn test_saved_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().expect("temp dir");
    let path = point_store_at(&dir);

    YamlConfigStore
        .save(&ProvisionConfig::default())
        .expect("save");

    let mode = std::fs::metadata(&path).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
#[serial]
fn test_partial_file_fills_in_defaults() {
    let dir = TempDir::new().expect("temp dir");
    let path = point_store_at(&dir);
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(&path, "visibility: public\n").expect("write");

    let config = YamlConfigStore.load().expect("load");

    assert_eq!(config.visibility, Visibility::Public);
    assert_eq!(config.poll, ProvisionConfig::default().poll);
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = point_store_at(&dir);
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(&path, "poll: not-a-map\n").expect("write");

    let err = YamlConfigStore.load().expect_err("malformed");

    assert!(err.to_string().contains("cannot parse"));
}

#[test]
#[serial]
fn test_path_honours_env_override() {
    let dir = TempDir::new().expect("temp dir");
    let path = point_store_at(&dir);

    assert_eq!(YamlConfigStore.path().expect("path"), path);
}
