//! Integration tests for runway-core
//!
//! These tests exercise the GitHub adapter over real HTTP against a local
//! mock server.
