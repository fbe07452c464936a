//! Error classification for provisioning stages.
//!
//! Pure mapping from a platform failure at a given stage to what the session
//! does next. No side effects.

use std::fmt;

use crate::domain::error::{PlatformError, ProvisionError};

/// Stage of the session that issued the failing platform call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authenticate,
    CreateRepository,
    DeployDescriptor,
    Trigger,
    Poll,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Authenticate => "authenticate",
            Self::CreateRepository => "create_repository",
            Self::DeployDescriptor => "deploy_descriptor",
            Self::Trigger => "trigger",
            Self::Poll => "poll",
        })
    }
}

/// What the session does with a stage failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Terminate the session as `Failed`.
    Fatal(ProvisionError),
    /// Log the warning and continue with the next stage.
    Tolerated(String),
    /// Expected absence; try again after the poll interval.
    Retry,
}

/// Classify `err` raised during `stage`.
#[must_use]
pub fn classify(stage: Stage, err: &PlatformError) -> Disposition {
    match (stage, err) {
        (Stage::Trigger, PlatformError::AlreadyExists) => {
            Disposition::Tolerated("trigger marker already exists, continuing".to_string())
        }
        (Stage::Poll, PlatformError::NotFound) => Disposition::Retry,
        (stage, err) => Disposition::Fatal(fatal(stage, err.to_string())),
    }
}

fn fatal(stage: Stage, message: String) -> ProvisionError {
    match stage {
        Stage::Authenticate => ProvisionError::Auth(message),
        Stage::CreateRepository => ProvisionError::Provision(message),
        Stage::DeployDescriptor => ProvisionError::Deploy(message),
        Stage::Trigger => ProvisionError::Trigger(message),
        Stage::Poll => ProvisionError::Poll(message),
    }
}

/// Classify a failure that can only be fatal at its stage.
///
/// Used for the mutating stages; a non-fatal disposition there would be a
/// classification bug and is reported as `Internal`.
#[must_use]
pub fn classify_fatal(stage: Stage, err: &PlatformError) -> ProvisionError {
    match classify(stage, err) {
        Disposition::Fatal(error) => error,
        other => ProvisionError::Internal(format!(
            "unexpected disposition {other:?} at stage {stage}"
        )),
    }
}
