//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`: never from `crate::infra`.

use async_trait::async_trait;

use crate::domain::{Credential, LogEvent, PlatformError, RepoHandle, SessionId, Visibility};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Parameters of a single file write on the remote platform.
#[derive(Debug, Clone, Copy)]
pub struct FileWrite<'a> {
    /// Repository-relative path, e.g. `.github/workflows/main.yml`.
    pub path: &'a str,
    /// Raw file content; the adapter handles any transport encoding.
    pub content: &'a [u8],
    /// Branch to commit to.
    pub branch: &'a str,
    /// Commit message.
    pub message: &'a str,
}

// ── Remote Platform Ports ─────────────────────────────────────────────────────

/// Exchanges a caller credential for an authenticated platform handle.
#[async_trait]
pub trait PlatformConnector: Send + Sync {
    /// Authenticate and resolve the acting account.
    async fn authenticate(
        &self,
        credential: &Credential,
    ) -> Result<Box<dyn RepoPlatform>, PlatformError>;
}

/// Repository capabilities of an authenticated platform account.
#[async_trait]
pub trait RepoPlatform: Send + Sync {
    /// Login of the account the credential belongs to.
    fn actor(&self) -> &str;

    /// Create a repository with an initial commit.
    async fn create_repository(
        &self,
        name: &SessionId,
        visibility: Visibility,
    ) -> Result<RepoHandle, PlatformError>;

    /// Create a file. Fails with `AlreadyExists` if the path is taken.
    async fn write_file(&self, repo: &RepoHandle, file: FileWrite<'_>)
    -> Result<(), PlatformError>;

    /// Read a file's raw bytes. Fails with `NotFound` if it does not exist yet.
    async fn read_file(&self, repo: &RepoHandle, path: &str) -> Result<Vec<u8>, PlatformError>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Observes session events as they are appended, in order, exactly once.
/// Sync trait: delivery must not block the session.
pub trait ProgressReporter {
    /// Deliver one event.
    fn emit(&self, event: &LogEvent);
}
