//! Batched rendering of a finished session.
//!
//! The streaming renderer lives in `crate::infra::stream`; both observe the
//! same event log, so the two delivery modes cannot diverge.

use crate::api::{ProvisionResponse, ResponseStatus};
use crate::application::ports::ProgressReporter;
use crate::domain::{LogEvent, ProvisionError, ProvisioningSession, SessionState};

/// Reporter for batched delivery: events are read from the session afterwards.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn emit(&self, _: &LogEvent) {}
}

/// Render a terminal session as the batched response body.
///
/// A session that is somehow not terminal renders as an internal error
/// rather than a misleading `pending`.
#[must_use]
pub fn render_batch(session: &ProvisioningSession) -> ProvisionResponse {
    let repo = session
        .id()
        .map(|id| id.as_str().to_string())
        .unwrap_or_default();
    let logs = session.events().iter().map(|e| e.message.clone()).collect();

    let (status, url, error) = match session.state() {
        SessionState::Succeeded => (
            ResponseStatus::Success,
            session.result().map(str::to_string),
            None,
        ),
        SessionState::TimedOut => (ResponseStatus::Pending, None, None),
        SessionState::Failed => (
            ResponseStatus::Error,
            None,
            Some(
                session
                    .error()
                    .map_or_else(|| "unknown failure".to_string(), ToString::to_string),
            ),
        ),
        state => (
            ResponseStatus::Error,
            None,
            Some(
                ProvisionError::Internal(format!("session ended in non-terminal state {state:?}"))
                    .to_string(),
            ),
        ),
    };

    ProvisionResponse {
        status,
        repo,
        url,
        error,
        logs,
    }
}

/// HTTP status for a rendered session: 200 success, 202 pending, error mapping otherwise.
#[must_use]
pub fn http_status(session: &ProvisioningSession) -> u16 {
    match session.state() {
        SessionState::Succeeded => 200,
        SessionState::TimedOut => 202,
        _ => session.error().map_or(500, ProvisionError::http_status),
    }
}
