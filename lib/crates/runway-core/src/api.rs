//! Wire types shared by the HTTP server and the CLI.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::config::Visibility;
use crate::domain::error::{ConfigError, ProvisionError};

/// How progress is delivered to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// One response after the session reaches a terminal state.
    #[default]
    Batch,
    /// One frame per progress event, closed at the terminal state.
    Stream,
}

impl std::str::FromStr for DeliveryMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "batch" => Ok(Self::Batch),
            "stream" => Ok(Self::Stream),
            other => Err(ConfigError::InvalidValue {
                key: "mode".to_string(),
                value: other.to_string(),
                valid: "batch, stream".to_string(),
            }),
        }
    }
}

/// Incoming provisioning request.
///
/// `github_token` is accepted as an alias of `credential`.
#[derive(Clone, Default, Deserialize)]
pub struct ProvisionRequest {
    #[serde(default, alias = "github_token")]
    pub credential: Option<String>,
    #[serde(default)]
    pub mode: Option<DeliveryMode>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
}

impl ProvisionRequest {
    #[must_use]
    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            credential: Some(credential.into()),
            ..Self::default()
        }
    }
}

impl fmt::Debug for ProvisionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisionRequest")
            .field("credential", &self.credential.as_ref().map(|_| "***"))
            .field("mode", &self.mode)
            .field("visibility", &self.visibility)
            .finish()
    }
}

/// Terminal status reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    /// The artifact did not appear in time; the caller may check again later.
    Pending,
    Error,
}

/// Batched response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionResponse {
    pub status: ResponseStatus,
    /// Session identifier; empty when the request was rejected before naming.
    pub repo: String,
    pub url: Option<String>,
    pub error: Option<String>,
    pub logs: Vec<String>,
}

impl ProvisionResponse {
    /// Response for a request refused before any session work started.
    #[must_use]
    pub fn rejected(error: &ProvisionError) -> Self {
        Self {
            status: ResponseStatus::Error,
            repo: String::new(),
            url: None,
            error: Some(error.to_string()),
            logs: vec![error.summary()],
        }
    }
}
