//! Application service: configuration use-cases.

use anyhow::Result;
use runway_core::domain::ProvisionConfig;
use runway_core::domain::config::apply_config_value;

use crate::application::ports::ConfigStore;

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the stored configuration cannot be read or is invalid.
pub fn load_config(store: &impl ConfigStore) -> Result<ProvisionConfig> {
    let config = store.load()?;
    config.validate()?;
    Ok(config)
}

/// Save configuration.
///
/// # Errors
///
/// Returns an error if the configuration cannot be written.
pub fn save_config(store: &impl ConfigStore, config: &ProvisionConfig) -> Result<()> {
    store.save(config)
}

/// Validate and persist a single `key = value` setting.
///
/// Nothing is written when the key or value is rejected.
///
/// # Errors
///
/// Returns an error if the key is unknown, the value is invalid, or the
/// configuration cannot be loaded or saved.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<ProvisionConfig> {
    let mut config = store.load()?;
    apply_config_value(&mut config, key, value)?;
    store.save(&config)?;
    Ok(config)
}
