//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra` or `crate::application`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

use crate::domain::session::SessionState;

// ── Platform errors ───────────────────────────────────────────────────────────

/// Failure reported by the remote platform for a single capability call.
///
/// Only the two variants the orchestrator reacts to are distinguished;
/// everything else carries the platform's message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("not found")]
    NotFound,

    #[error("already exists")]
    AlreadyExists,

    #[error("{0}")]
    Other(String),
}

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Failure taxonomy for a provisioning session.
///
/// Stage variants display the underlying platform message unchanged so the
/// caller sees exactly what the platform said (e.g. `rate limit exceeded`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    #[error("Missing credential")]
    MissingCredential,

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Provision(String),

    #[error("{0}")]
    Deploy(String),

    #[error("{0}")]
    Trigger(String),

    #[error("{0}")]
    Poll(String),

    #[error("result artifact did not appear after {attempts} attempts")]
    Timeout { attempts: u32 },

    #[error("{0}")]
    Internal(String),
}

impl ProvisionError {
    /// Stable machine-readable code used in JSON output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::Auth(_) => "auth_error",
            Self::Provision(_) => "provision_error",
            Self::Deploy(_) => "deploy_error",
            Self::Trigger(_) => "trigger_error",
            Self::Poll(_) => "poll_error",
            Self::Timeout { .. } => "timeout",
            Self::Internal(_) => "internal_error",
        }
    }

    /// HTTP status an outer transport should answer with.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::MissingCredential => 400,
            Self::Auth(_) => 401,
            Self::Provision(_) | Self::Deploy(_) | Self::Trigger(_) | Self::Poll(_) => 502,
            Self::Timeout { .. } => 202,
            Self::Internal(_) => 500,
        }
    }

    /// One-line progress message recorded when the error ends a session.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::MissingCredential => "missing credential".to_string(),
            Self::Auth(msg) => format!("authentication failed: {msg}"),
            Self::Provision(msg) => format!("repository creation failed: {msg}"),
            Self::Deploy(msg) => format!("descriptor deployment failed: {msg}"),
            Self::Trigger(msg) => format!("pipeline trigger failed: {msg}"),
            Self::Poll(msg) => format!("result artifact read failed: {msg}"),
            Self::Timeout { .. } => self.to_string(),
            Self::Internal(msg) => format!("internal error: {msg}"),
        }
    }
}

// ── Session errors ────────────────────────────────────────────────────────────

/// Violations of the session state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("illegal session transition {from:?} -> {to:?}")]
    IllegalTransition { from: SessionState, to: SessionState },

    #[error("session identifier already assigned")]
    AlreadyNamed,

    #[error("session has no remote repository")]
    NoRemote,

    #[error("Invalid session ID: {0}")]
    InvalidId(String),
}

impl From<SessionError> for ProvisionError {
    fn from(err: SessionError) -> Self {
        Self::Internal(err.to_string())
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
