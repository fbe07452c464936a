//! Streaming delivery: events leave the session as they are appended.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::ProvisionRequest;
use crate::application::ports::{PlatformConnector, ProgressReporter};
use crate::application::services::run_session;
use crate::domain::{LogEvent, ProvisioningSession, SessionSettings};

/// Forwards events into an unbounded channel.
///
/// A dropped receiver does not affect the session; later events are discarded.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    tx: mpsc::UnboundedSender<LogEvent>,
}

impl ChannelReporter {
    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<LogEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressReporter for ChannelReporter {
    fn emit(&self, event: &LogEvent) {
        if self.tx.send(event.clone()).is_err() {
            tracing::debug!("stream receiver gone, event discarded");
        }
    }
}

/// A session running in the background with its live event feed.
#[derive(Debug)]
pub struct SessionStream {
    /// Events in append order. Closes when the session reaches a terminal state.
    pub events: mpsc::UnboundedReceiver<LogEvent>,
    /// Resolves to the terminal session.
    pub session: JoinHandle<ProvisioningSession>,
}

/// Spawn a session whose events are delivered through a channel.
///
/// Must be called from within a Tokio runtime.
#[must_use]
pub fn stream_session(
    connector: Arc<dyn PlatformConnector>,
    request: ProvisionRequest,
    settings: Arc<SessionSettings>,
) -> SessionStream {
    let (tx, events) = mpsc::unbounded_channel();
    let session = tokio::spawn(async move {
        let reporter = ChannelReporter::new(tx);
        run_session(connector.as_ref(), &request, &settings, &reporter).await
    });
    SessionStream { events, session }
}
