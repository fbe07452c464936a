//! Application services: use-case orchestration.
//!
//! `provision` drives a session through its stages, `poll` owns the bounded
//! wait for the result artifact, and `report` renders finished sessions.

pub mod poll;
pub mod provision;
pub mod report;

pub use poll::{ArtifactPoller, PollStep, await_artifact};
pub use provision::run_session;
pub use report::{NoopReporter, http_status, render_batch};
