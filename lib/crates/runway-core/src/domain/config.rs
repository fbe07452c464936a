//! Provisioning configuration: schema, defaults, validators.
//!
//! Pure types and functions only: no I/O. Loading lives with the binaries
//! (YAML file for the CLI, environment for the server).

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_DESCRIPTOR_PATH: &str = ".github/workflows/main.yml";
pub const DEFAULT_TRIGGER_PATH: &str = "trigger.txt";
pub const DEFAULT_RESULT_PATH: &str = "remote.txt";
pub const DEFAULT_POLL_ATTEMPTS: u32 = 60;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_url",
    "visibility",
    "branch",
    "poll.attempts",
    "poll.interval_secs",
    "descriptor_file",
];
pub const VALID_VISIBILITIES: &[&str] = &["private", "public"];

// ── Visibility ───────────────────────────────────────────────────────────────

/// Visibility policy of the created repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

impl Visibility {
    #[must_use]
    pub fn is_private(self) -> bool {
        self == Self::Private
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Private => "private",
            Self::Public => "public",
        })
    }
}

impl FromStr for Visibility {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "public" => Ok(Self::Public),
            other => Err(ConfigError::InvalidValue {
                key: "visibility".to_string(),
                value: other.to_string(),
                valid: VALID_VISIBILITIES.join(", "),
            }),
        }
    }
}

// ── Config schema ────────────────────────────────────────────────────────────

/// Paths and branch used inside the created repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoLayout {
    /// Branch every file is written to.
    pub branch: String,
    /// Where the pipeline descriptor is deployed.
    pub descriptor_path: String,
    /// Marker file whose creation starts the pipeline.
    pub trigger_path: String,
    /// File the pipeline publishes when the environment is reachable.
    pub result_path: String,
}

impl Default for RepoLayout {
    fn default() -> Self {
        Self {
            branch: DEFAULT_BRANCH.to_string(),
            descriptor_path: DEFAULT_DESCRIPTOR_PATH.to_string(),
            trigger_path: DEFAULT_TRIGGER_PATH.to_string(),
            result_path: DEFAULT_RESULT_PATH.to_string(),
        }
    }
}

/// Polling budget as stored in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub attempts: u32,
    pub interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_POLL_ATTEMPTS,
            interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

/// Top-level provisioning configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Base URL of the platform REST API.
    pub api_url: String,
    /// Default repository visibility; a request may override it.
    pub visibility: Visibility,
    #[serde(flatten)]
    pub layout: RepoLayout,
    pub poll: PollConfig,
    /// Custom descriptor file. The embedded default is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptor_file: Option<PathBuf>,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            visibility: Visibility::default(),
            layout: RepoLayout::default(),
            poll: PollConfig::default(),
            descriptor_file: None,
        }
    }
}

impl ProvisionConfig {
    /// # Errors
    ///
    /// Returns an error if the API URL is not http(s), a path is empty, or
    /// the poll budget allows no attempt.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("https://") || self.api_url.starts_with("http://")) {
            return Err(ConfigError::Invalid(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        let layout = &self.layout;
        for (name, value) in [
            ("branch", &layout.branch),
            ("descriptor_path", &layout.descriptor_path),
            ("trigger_path", &layout.trigger_path),
            ("result_path", &layout.result_path),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name} must not be empty")));
            }
        }
        if self.poll.attempts == 0 {
            return Err(ConfigError::Invalid(
                "poll.attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            self.poll.attempts,
            Duration::from_secs(self.poll.interval_secs),
        )
    }
}

// ── Runtime settings ─────────────────────────────────────────────────────────

/// Bounded linear polling policy: fixed attempt count, fixed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    max_attempts: u32,
    interval: Duration,
}

impl PollPolicy {
    /// A zero attempt budget is raised to one: the poller always reads once.
    #[must_use]
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Opaque pipeline descriptor, uploaded verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor(Arc<[u8]>);

impl Descriptor {
    #[must_use]
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Everything a session needs besides the request itself.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub descriptor: Descriptor,
    pub layout: RepoLayout,
    pub visibility: Visibility,
    pub poll: PollPolicy,
}

impl SessionSettings {
    #[must_use]
    pub fn from_config(config: &ProvisionConfig, descriptor: Descriptor) -> Self {
        Self {
            descriptor,
            layout: config.layout.clone(),
            visibility: config.visibility,
            poll: config.poll_policy(),
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<(), ConfigError> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        });
    }
    Ok(())
}

/// Apply `key = value` to `config`, validating the value.
///
/// # Errors
///
/// Returns an error if the key is unknown or the value does not parse.
pub fn apply_config_value(
    config: &mut ProvisionConfig,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    validate_config_key(key)?;
    let invalid = |valid: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        valid: valid.to_string(),
    };
    match key {
        "api_url" => config.api_url = value.to_string(),
        "visibility" => config.visibility = value.parse()?,
        "branch" if !value.trim().is_empty() => config.layout.branch = value.to_string(),
        "branch" => return Err(invalid("a non-empty branch name")),
        "poll.attempts" => {
            config.poll.attempts = value
                .parse()
                .ok()
                .filter(|n: &u32| *n > 0)
                .ok_or_else(|| invalid("a positive integer"))?;
        }
        "poll.interval_secs" => {
            config.poll.interval_secs = value
                .parse()
                .map_err(|_| invalid("a non-negative integer"))?;
        }
        "descriptor_file" => config.descriptor_file = Some(PathBuf::from(value)),
        _ => {
            return Err(ConfigError::UnknownKey {
                key: key.to_string(),
                valid: VALID_CONFIG_KEYS.join(", "),
            });
        }
    }
    config.validate()
}
