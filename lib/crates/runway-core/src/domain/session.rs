//! Provisioning session: state machine, event log, and value types.
//!
//! Pure data and transition rules only. The session is request-scoped and
//! never persisted; it is mutated by the provisioning service as stages
//! complete and read by the renderers once it is terminal.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::error::{ProvisionError, SessionError};

// ── Value types ───────────────────────────────────────────────────────────────

/// Opaque access token presented by the caller.
///
/// The core never inspects it. `Debug` is redacted and there is no
/// `Serialize` impl, so it cannot leak through logs or responses.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token, for the platform adapter only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Session identifier, also used as the remote repository name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub(crate) fn from_raw(raw: String) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to the repository a session created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoHandle {
    /// Account that owns the repository.
    pub owner: String,
    /// Repository name (equal to the session identifier).
    pub name: String,
}

impl RepoHandle {
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// `owner/name`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

// ── Events ────────────────────────────────────────────────────────────────────

/// Severity of a progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Step,
    Success,
    Warn,
    Error,
}

/// One entry of the session's append-only progress log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: EventLevel,
    pub message: String,
}

// ── State machine ─────────────────────────────────────────────────────────────

/// Lifecycle state of a provisioning session.
///
/// Declaration order is stage order, so `Ord` compares progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Init,
    Authenticated,
    RepoCreated,
    DescriptorDeployed,
    Triggered,
    Polling,
    Succeeded,
    TimedOut,
    Failed,
}

impl SessionState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::TimedOut | Self::Failed)
    }

    /// Forward-only transitions; `Failed` is reachable from any non-terminal state.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (_, Self::Failed)
                | (Self::Init, Self::Authenticated)
                | (Self::Authenticated, Self::RepoCreated)
                | (Self::RepoCreated, Self::DescriptorDeployed)
                | (Self::DescriptorDeployed, Self::Triggered)
                | (Self::Triggered, Self::Polling)
                | (Self::Polling, Self::Succeeded | Self::TimedOut)
        )
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// One end-to-end provisioning attempt.
///
/// Invariants upheld by the mutators:
/// - `result` is set iff `state == Succeeded`;
/// - `remote` is set once `RepoCreated` is reached and kept afterwards;
/// - once terminal, `events` is frozen and no transition is accepted.
#[derive(Debug, Default)]
pub struct ProvisioningSession {
    id: Option<SessionId>,
    state: SessionState,
    credential: Option<Credential>,
    remote: Option<RepoHandle>,
    result: Option<String>,
    error: Option<ProvisionError>,
    timed_out_after: Option<u32>,
    events: Vec<LogEvent>,
}

impl ProvisioningSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn id(&self) -> Option<&SessionId> {
        self.id.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    #[must_use]
    pub fn remote(&self) -> Option<&RepoHandle> {
        self.remote.as_ref()
    }

    #[must_use]
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&ProvisionError> {
        self.error.as_ref()
    }

    /// Attempts consumed when the session timed out.
    #[must_use]
    pub fn timed_out_after(&self) -> Option<u32> {
        self.timed_out_after
    }

    #[must_use]
    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Hold the admitted credential and name the session.
    ///
    /// # Errors
    ///
    /// Returns an error unless the session is still unnamed in `Init`.
    pub fn admit(&mut self, credential: Credential, id: SessionId) -> Result<(), SessionError> {
        if self.id.is_some() {
            return Err(SessionError::AlreadyNamed);
        }
        if self.state != SessionState::Init {
            return Err(SessionError::IllegalTransition {
                from: self.state,
                to: SessionState::Init,
            });
        }
        self.credential = Some(credential);
        self.id = Some(id);
        Ok(())
    }

    /// Append a progress event. Returns `None` once the session is terminal.
    pub fn record(&mut self, level: EventLevel, message: impl Into<String>) -> Option<&LogEvent> {
        if self.is_terminal() {
            return None;
        }
        self.events.push(LogEvent {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        });
        self.events.last()
    }

    /// # Errors
    ///
    /// Returns an error on an illegal transition.
    pub fn mark_authenticated(&mut self) -> Result<(), SessionError> {
        self.advance(SessionState::Authenticated)
    }

    /// # Errors
    ///
    /// Returns an error on an illegal transition.
    pub fn mark_repo_created(&mut self, handle: RepoHandle) -> Result<(), SessionError> {
        self.advance(SessionState::RepoCreated)?;
        self.remote = Some(handle);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error on an illegal transition.
    pub fn mark_descriptor_deployed(&mut self) -> Result<(), SessionError> {
        self.advance(SessionState::DescriptorDeployed)
    }

    /// # Errors
    ///
    /// Returns an error on an illegal transition.
    pub fn mark_triggered(&mut self) -> Result<(), SessionError> {
        self.advance(SessionState::Triggered)
    }

    /// # Errors
    ///
    /// Returns an error on an illegal transition.
    pub fn mark_polling(&mut self) -> Result<(), SessionError> {
        self.advance(SessionState::Polling)
    }

    /// Store the artifact content and enter `Succeeded`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the session is `Polling`.
    pub fn succeed(&mut self, content: String) -> Result<(), SessionError> {
        self.check(SessionState::Succeeded)?;
        self.record(EventLevel::Success, format!("result artifact ready: {content}"));
        self.result = Some(content);
        self.finish(SessionState::Succeeded);
        Ok(())
    }

    /// Enter `TimedOut` after `attempts` reads without a result.
    ///
    /// # Errors
    ///
    /// Returns an error unless the session is `Polling`.
    pub fn time_out(&mut self, attempts: u32) -> Result<(), SessionError> {
        self.check(SessionState::TimedOut)?;
        self.record(
            EventLevel::Warn,
            ProvisionError::Timeout { attempts }.summary(),
        );
        self.timed_out_after = Some(attempts);
        self.finish(SessionState::TimedOut);
        Ok(())
    }

    /// Record the error and enter `Failed`. No-op on a terminal session.
    pub fn fail(&mut self, error: ProvisionError) {
        if self.is_terminal() {
            return;
        }
        self.record(EventLevel::Error, error.summary());
        self.error = Some(error);
        self.finish(SessionState::Failed);
    }

    fn check(&self, next: SessionState) -> Result<(), SessionError> {
        if self.state.can_transition_to(next) {
            Ok(())
        } else {
            Err(SessionError::IllegalTransition {
                from: self.state,
                to: next,
            })
        }
    }

    fn advance(&mut self, next: SessionState) -> Result<(), SessionError> {
        self.check(next)?;
        self.state = next;
        Ok(())
    }

    fn finish(&mut self, terminal: SessionState) {
        self.state = terminal;
        self.credential = None;
    }
}
