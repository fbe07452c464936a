//! Unit tests for runway CLI
//!
//! These tests use mocked dependencies and run fast without external I/O.

mod config_service;
mod config_store;
