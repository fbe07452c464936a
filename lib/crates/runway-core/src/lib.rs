//! Runway core: provisions ephemeral environments through a hosted
//! version-control-and-automation platform.
//!
//! A session creates a throwaway repository, deploys a pipeline descriptor,
//! triggers it, and waits for the pipeline to publish a result file.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod api;
pub mod application;
pub mod domain;
pub mod infra;
