//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: the GitHub REST adapter,
//! the channel-backed streaming reporter, and descriptor loading.
//!
//! Imports from `crate::domain` and `crate::application` are allowed.

pub mod descriptor;
pub mod github;
pub mod stream;
