//! Unit tests for the configuration use-cases against a mocked store.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use mockall::predicate::*;
use runway_cli::application::ports::ConfigStore;
use runway_cli::application::services::config_service;
use runway_core::domain::{ProvisionConfig, Visibility};

mockall::mock! {
    pub Store {}
    impl ConfigStore for Store {
        fn load(&self) -> anyhow::Result<ProvisionConfig>;
        fn save(&self, config: &ProvisionConfig) -> anyhow::Result<()>;
        fn path(&self) -> anyhow::Result<PathBuf>;
    }
}

fn store_with(config: ProvisionConfig) -> MockStore {
    let mut store = MockStore::new();
    store.expect_load().returning(move || Ok(config.clone()));
    store
}

#[test]
fn test_load_config_returns_stored_values() {
    let stored = ProvisionConfig {
        visibility: Visibility::Public,
        ..ProvisionConfig::default()
    };
    let store = store_with(stored.clone());

    let config = config_service::load_config(&store).expect("load");

    assert_eq!(config, stored);
}

#[test]
fn test_load_config_rejects_invalid_stored_values() {
    let mut stored = ProvisionConfig::default();
    stored.poll.attempts = 0;
    let store = store_with(stored);

    let err = config_service::load_config(&store).expect_err("invalid");

    assert!(err.to_string().contains("poll.attempts"));
}

#[test]
fn test_load_config_propagates_store_errors() {
    let mut store = MockStore::new();
    store
        .expect_load()
        .returning(|| Err(anyhow::anyhow!("cannot parse config.yaml")));

    let err = config_service::load_config(&store).expect_err("broken file");

    assert!(err.to_string().contains("cannot parse"));
}

#[test]
fn test_set_value_persists_updated_config() {
    let mut store = store_with(ProvisionConfig::default());
    store
        .expect_save()
        .with(function(|c: &ProvisionConfig| c.visibility == Visibility::Public))
        .times(1)
        .returning(|_| Ok(()));

    let config = config_service::set_value(&store, "visibility", "public").expect("set");

    assert_eq!(config.visibility, Visibility::Public);
}

#[test]
fn test_set_value_updates_poll_budget() {
    let mut store = store_with(ProvisionConfig::default());
    store.expect_save().times(1).returning(|_| Ok(()));

    let config = config_service::set_value(&store, "poll.attempts", "12").expect("set");

    assert_eq!(config.poll.attempts, 12);
}

#[test]
fn test_set_value_unknown_key_writes_nothing() {
    let mut store = store_with(ProvisionConfig::default());
    store.expect_save().never();

    let err = config_service::set_value(&store, "region", "eu").expect_err("unknown key");

    assert!(err.to_string().contains("Unknown setting: region"));
}

#[test]
fn test_set_value_invalid_value_writes_nothing() {
    let mut store = store_with(ProvisionConfig::default());
    store.expect_save().never();

    let err = config_service::set_value(&store, "poll.attempts", "0").expect_err("zero attempts");

    assert!(err.to_string().contains("a positive integer"));
}

#[test]
fn test_set_value_propagates_save_failure() {
    let mut store = store_with(ProvisionConfig::default());
    store
        .expect_save()
        .returning(|_| Err(anyhow::anyhow!("cannot write config.yaml")));

    let err = config_service::set_value(&store, "branch", "trunk").expect_err("save fails");

    assert!(err.to_string().contains("cannot write"));
}
