//! Application services: use-case orchestration.

pub mod config_service;
