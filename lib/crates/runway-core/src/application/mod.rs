//! Application layer: port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain` and `crate::api`: never on
//! `crate::infra`.

pub mod ports;
pub mod services;

pub use ports::{FileWrite, PlatformConnector, ProgressReporter, RepoPlatform};
