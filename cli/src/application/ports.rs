//! Port trait definitions for the CLI application layer.

use std::path::PathBuf;

use anyhow::Result;
use runway_core::domain::ProvisionConfig;

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load configuration; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<ProvisionConfig>;

    /// Persist configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, config: &ProvisionConfig) -> Result<()>;

    /// Location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}
