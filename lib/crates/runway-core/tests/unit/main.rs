//! Unit tests for runway-core
//!
//! These tests drive sessions against scripted platforms and run without
//! network I/O. Time-dependent tests use Tokio's paused clock.

mod identifier;
mod poller;
