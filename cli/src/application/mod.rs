//! Application layer: CLI-side ports and use-cases.
//!
//! Provisioning itself lives in `runway_core`; this layer only covers what
//! the CLI adds on top: persistent configuration.

pub mod ports;
pub mod services;
