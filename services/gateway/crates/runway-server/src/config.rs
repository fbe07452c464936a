//! Gateway configuration loaded from `RUNWAY_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use runway_core::api::DeliveryMode;
use runway_core::domain::ProvisionConfig;
use runway_core::domain::config::{
    DEFAULT_API_URL, DEFAULT_BRANCH, DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_SECS, PollConfig,
    RepoLayout,
};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "RUNWAY_";

/// Server configuration loaded from environment variables via `envy`.
///
/// Each field maps to `RUNWAY_<FIELD>`:
///   - `RUNWAY_LISTEN_ADDR`        (default `0.0.0.0:8080`)
///   - `RUNWAY_DEFAULT_MODE`       (default `batch`)
///   - `RUNWAY_API_URL`            (default `https://api.github.com`)
///   - `RUNWAY_VISIBILITY`         (default `private`)
///   - `RUNWAY_BRANCH`             (default `main`)
///   - `RUNWAY_POLL_ATTEMPTS`      (default `60`)
///   - `RUNWAY_POLL_INTERVAL_SECS` (default `5`)
///   - `RUNWAY_DESCRIPTOR_FILE`    (optional, embedded descriptor otherwise)
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind the HTTP server to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Delivery mode for requests that do not name one.
    #[serde(default = "default_mode")]
    pub default_mode: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_visibility")]
    pub visibility: String,

    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    pub descriptor_file: Option<String>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_mode() -> String {
    "batch".to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_visibility() -> String {
    "private".to_string()
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_poll_attempts() -> u32 {
    DEFAULT_POLL_ATTEMPTS
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

impl ServerConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable does not parse.
    pub fn from_env() -> Result<Self> {
        envy::prefixed(ENV_PREFIX)
            .from_env()
            .context("failed to load config from RUNWAY_* env vars")
    }

    /// Load from explicit `(name, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable does not parse.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .context("failed to load config from RUNWAY_* variables")
    }

    /// # Errors
    ///
    /// Returns an error if the mode name is unknown.
    pub fn delivery_mode(&self) -> Result<DeliveryMode> {
        self.default_mode
            .parse()
            .context("invalid RUNWAY_DEFAULT_MODE")
    }

    pub fn descriptor_file(&self) -> Option<&Path> {
        self.descriptor_file.as_deref().map(Path::new)
    }

    /// Build and validate the provisioning configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is invalid.
    pub fn provision_config(&self) -> Result<ProvisionConfig> {
        let config = ProvisionConfig {
            api_url: self.api_url.clone(),
            visibility: self.visibility.parse().context("invalid RUNWAY_VISIBILITY")?,
            layout: RepoLayout {
                branch: self.branch.clone(),
                ..RepoLayout::default()
            },
            poll: PollConfig {
                attempts: self.poll_attempts,
                interval_secs: self.poll_interval_secs,
            },
            descriptor_file: self.descriptor_file.as_ref().map(PathBuf::from),
        };
        config.validate().context("invalid provisioning config")?;
        Ok(config)
    }
}
