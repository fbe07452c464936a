//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, or `reqwest`. All functions are synchronous and take data in,
//! returning data out.

pub mod classify;
pub mod config;
pub mod credential;
pub mod error;
pub mod identifier;
pub mod session;

pub use classify::{Disposition, Stage, classify};
pub use config::{
    Descriptor, PollPolicy, ProvisionConfig, RepoLayout, SessionSettings, Visibility,
};
pub use error::{ConfigError, PlatformError, ProvisionError, SessionError};
pub use identifier::{generate_session_id, validate_session_id};
pub use session::{
    Credential, EventLevel, LogEvent, ProvisioningSession, RepoHandle, SessionId, SessionState,
};
