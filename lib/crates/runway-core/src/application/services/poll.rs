//! Artifact poller: bounded-attempt, fixed-interval wait for the result file.
//!
//! The poller is an explicit state machine: each `poll_once` issues exactly
//! one read and says whether to stop or wait.

use crate::application::ports::RepoPlatform;
use crate::domain::classify::{Disposition, Stage, classify};
use crate::domain::{PollPolicy, ProvisionError, RepoHandle};

/// Result of one poll attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep {
    /// Artifact present; content decoded and trimmed.
    Found { content: String, attempt: u32 },
    /// Not present yet; wait one interval before the next attempt.
    Pending { attempt: u32 },
    /// Budget used up without a result. No further read is issued.
    Exhausted { attempts: u32 },
}

impl PollStep {
    #[must_use]
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Pending { .. })
    }
}

/// Bounded poller over a single repository path.
#[derive(Debug)]
pub struct ArtifactPoller {
    policy: PollPolicy,
    attempts: u32,
    finished: bool,
}

impl ArtifactPoller {
    #[must_use]
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
            finished: false,
        }
    }

    /// Reads issued so far.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Issue one read of `path`.
    ///
    /// A missing file, or one that is still empty, counts as "not yet".
    ///
    /// # Errors
    ///
    /// Returns `PollError` for any other read failure, immediately and
    /// without consuming the remaining budget, and `Internal` if called
    /// after a final step.
    pub async fn poll_once(
        &mut self,
        platform: &dyn RepoPlatform,
        repo: &RepoHandle,
        path: &str,
    ) -> Result<PollStep, ProvisionError> {
        if self.finished {
            return Err(ProvisionError::Internal(
                "artifact poller already finished".to_string(),
            ));
        }
        self.attempts += 1;
        let attempt = self.attempts;

        match platform.read_file(repo, path).await {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes).trim().to_string();
                if !content.is_empty() {
                    self.finished = true;
                    return Ok(PollStep::Found { content, attempt });
                }
                tracing::debug!(repo = %repo.full_name(), attempt, "result artifact empty");
            }
            Err(err) => match classify(Stage::Poll, &err) {
                Disposition::Fatal(error) => {
                    self.finished = true;
                    return Err(error);
                }
                Disposition::Retry | Disposition::Tolerated(_) => {}
            },
        }

        if attempt >= self.policy.max_attempts() {
            self.finished = true;
            Ok(PollStep::Exhausted { attempts: attempt })
        } else {
            Ok(PollStep::Pending { attempt })
        }
    }

    /// Wait one interval. Called only after a `Pending` step.
    pub async fn wait(&self) {
        tokio::time::sleep(self.policy.interval()).await;
    }
}

/// Poll `path` until it appears or the budget is exhausted.
///
/// `observe` sees every step, including the final one.
///
/// # Errors
///
/// Returns `PollError` on the first read failure other than "not found".
pub async fn await_artifact(
    platform: &dyn RepoPlatform,
    repo: &RepoHandle,
    path: &str,
    policy: PollPolicy,
    mut observe: impl FnMut(&PollStep),
) -> Result<PollStep, ProvisionError> {
    let mut poller = ArtifactPoller::new(policy);
    loop {
        let step = poller.poll_once(platform, repo, path).await?;
        observe(&step);
        if step.is_final() {
            return Ok(step);
        }
        poller.wait().await;
    }
}
