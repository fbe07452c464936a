//! Infrastructure layer: concrete implementations of CLI port traits.

pub mod config;
