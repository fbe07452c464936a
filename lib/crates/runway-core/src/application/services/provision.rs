//! Application service: provisioning session use-case.
//!
//! Imports only from `crate::domain` and `crate::application`.
//! All remote I/O is routed through the injected `PlatformConnector`.
//!
//! Stages run strictly in order: authenticate, create repository, deploy
//! descriptor, trigger, poll. Mutating stages are never retried; only the
//! poll stage repeats, under its own bounded policy.

use crate::api::ProvisionRequest;
use crate::application::ports::{FileWrite, PlatformConnector, ProgressReporter, RepoPlatform};
use crate::application::services::poll::{PollStep, await_artifact};
use crate::domain::classify::{Disposition, Stage, classify, classify_fatal};
use crate::domain::{
    Credential, EventLevel, ProvisionError, ProvisioningSession, RepoHandle, SessionError,
    SessionId, SessionSettings, Visibility, credential, generate_session_id,
};

/// Commit message of the descriptor deployment.
pub const DESCRIPTOR_COMMIT_MESSAGE: &str = "Add pipeline descriptor";
/// Commit message of the trigger marker.
pub const TRIGGER_COMMIT_MESSAGE: &str = "Trigger pipeline";
/// Content of the trigger marker; only its presence matters.
pub const TRIGGER_CONTENT: &[u8] = b"Trigger pipeline run\n";

/// Run one provisioning session to a terminal state.
///
/// Every event is appended to the returned session and handed to `reporter`
/// at the moment it is appended. The returned session is always terminal.
pub async fn run_session<R: ProgressReporter + ?Sized>(
    connector: &dyn PlatformConnector,
    request: &ProvisionRequest,
    settings: &SessionSettings,
    reporter: &R,
) -> ProvisioningSession {
    let mut rec = Recorder::new(reporter);

    let credential = match credential::validate(request) {
        Ok(credential) => credential,
        Err(error) => {
            tracing::warn!(code = error.code(), "request rejected before provisioning");
            return rec.fail(error);
        }
    };

    let id = generate_session_id();
    if let Err(error) = rec.session.admit(credential.clone(), id.clone()) {
        return rec.fail(error.into());
    }
    let visibility = request.visibility.unwrap_or(settings.visibility);
    tracing::info!(session_id = %id, ?visibility, "provisioning session started");

    let platform = match provision(connector, &credential, &id, visibility, settings, &mut rec).await
    {
        Ok(platform) => platform,
        Err(error) => {
            tracing::warn!(session_id = %id, code = error.code(), "provisioning failed");
            return rec.fail(error);
        }
    };

    if let Err(error) = watch(platform.as_ref(), settings, &mut rec).await {
        tracing::warn!(session_id = %id, code = error.code(), "polling failed");
        return rec.fail(error);
    }

    let session = rec.finish();
    tracing::info!(session_id = %id, state = ?session.state(), "provisioning session finished");
    session
}

/// Authenticate, create the repository, deploy the descriptor, and trigger.
///
/// Returns the authenticated platform handle for the polling phase.
async fn provision<R: ProgressReporter + ?Sized>(
    connector: &dyn PlatformConnector,
    credential: &Credential,
    id: &SessionId,
    visibility: Visibility,
    settings: &SessionSettings,
    rec: &mut Recorder<'_, R>,
) -> Result<Box<dyn RepoPlatform>, ProvisionError> {
    let layout = &settings.layout;

    // Step 1: Authenticate and resolve the acting account.
    rec.log(EventLevel::Step, "authenticating credential...");
    let platform = connector
        .authenticate(credential)
        .await
        .map_err(|e| classify_fatal(Stage::Authenticate, &e))?;
    rec.apply(ProvisioningSession::mark_authenticated)?;
    rec.log(
        EventLevel::Success,
        format!("authenticated as {}", platform.actor()),
    );

    // Step 2: Create the repository with an initial commit.
    rec.log(EventLevel::Step, format!("creating repository {id}..."));
    let handle = platform
        .create_repository(id, visibility)
        .await
        .map_err(|e| classify_fatal(Stage::CreateRepository, &e))?;
    let full_name = handle.full_name();
    rec.apply(|s| s.mark_repo_created(handle))?;
    rec.log(
        EventLevel::Success,
        format!("repository {full_name} created ({visibility})"),
    );
    tracing::info!(session_id = %id, repo = %full_name, "repository created");

    // Step 3: Deploy the descriptor verbatim.
    rec.log(
        EventLevel::Step,
        format!("deploying pipeline descriptor to {}...", layout.descriptor_path),
    );
    platform
        .write_file(
            rec.remote()?,
            FileWrite {
                path: &layout.descriptor_path,
                content: settings.descriptor.as_bytes(),
                branch: &layout.branch,
                message: DESCRIPTOR_COMMIT_MESSAGE,
            },
        )
        .await
        .map_err(|e| classify_fatal(Stage::DeployDescriptor, &e))?;
    rec.apply(ProvisioningSession::mark_descriptor_deployed)?;
    rec.log(EventLevel::Success, "pipeline descriptor deployed");

    // Step 4: Trigger by writing the marker; an existing marker is fine.
    rec.log(EventLevel::Step, "triggering pipeline...");
    let trigger = platform
        .write_file(
            rec.remote()?,
            FileWrite {
                path: &layout.trigger_path,
                content: TRIGGER_CONTENT,
                branch: &layout.branch,
                message: TRIGGER_COMMIT_MESSAGE,
            },
        )
        .await;
    match trigger {
        Ok(()) => rec.log(EventLevel::Success, "pipeline triggered"),
        Err(err) => match classify(Stage::Trigger, &err) {
            Disposition::Tolerated(warning) => {
                tracing::warn!(session_id = %id, "{warning}");
                rec.log(EventLevel::Warn, warning);
            }
            Disposition::Fatal(error) => return Err(error),
            Disposition::Retry => {
                return Err(ProvisionError::Internal(
                    "trigger failure classified as retryable".to_string(),
                ));
            }
        },
    }
    rec.apply(ProvisioningSession::mark_triggered)?;

    Ok(platform)
}

/// Poll for the result artifact until found, exhausted, or a hard failure.
async fn watch<R: ProgressReporter + ?Sized>(
    platform: &dyn RepoPlatform,
    settings: &SessionSettings,
    rec: &mut Recorder<'_, R>,
) -> Result<(), ProvisionError> {
    let path = &settings.layout.result_path;
    let max = settings.poll.max_attempts();

    rec.apply(ProvisioningSession::mark_polling)?;
    rec.log(EventLevel::Step, format!("waiting for {path}..."));

    let repo = rec.remote()?.clone();
    let outcome = await_artifact(platform, &repo, path, settings.poll, |step| match step {
        PollStep::Found { attempt, .. } => rec.log(
            EventLevel::Success,
            format!("found {path} (attempt {attempt}/{max})"),
        ),
        PollStep::Pending { attempt } => rec.log(
            EventLevel::Step,
            format!("{path} not present yet (attempt {attempt}/{max})"),
        ),
        PollStep::Exhausted { .. } => {}
    })
    .await?;

    match outcome {
        PollStep::Found { content, .. } => rec.apply(|s| s.succeed(content)),
        PollStep::Exhausted { attempts } => rec.apply(|s| s.time_out(attempts)),
        PollStep::Pending { attempt } => Err(ProvisionError::Internal(format!(
            "poller stopped on non-final attempt {attempt}"
        ))),
    }
}

// ── Recorder ──────────────────────────────────────────────────────────────────

/// Owns the session and forwards each newly appended event to the reporter.
///
/// `delivered` counts forwarded events, so every event reaches the reporter
/// once, in append order, including those appended by terminal transitions.
struct Recorder<'r, R: ProgressReporter + ?Sized> {
    session: ProvisioningSession,
    reporter: &'r R,
    delivered: usize,
}

impl<'r, R: ProgressReporter + ?Sized> Recorder<'r, R> {
    fn new(reporter: &'r R) -> Self {
        Self {
            session: ProvisioningSession::new(),
            reporter,
            delivered: 0,
        }
    }

    fn log(&mut self, level: EventLevel, message: impl Into<String>) {
        self.session.record(level, message);
        self.flush();
    }

    fn apply(
        &mut self,
        transition: impl FnOnce(&mut ProvisioningSession) -> Result<(), SessionError>,
    ) -> Result<(), ProvisionError> {
        let result = transition(&mut self.session);
        self.flush();
        result.map_err(ProvisionError::from)
    }

    fn remote(&self) -> Result<&RepoHandle, ProvisionError> {
        self.session
            .remote()
            .ok_or_else(|| SessionError::NoRemote.into())
    }

    fn flush(&mut self) {
        let events = self.session.events();
        for event in &events[self.delivered..] {
            self.reporter.emit(event);
        }
        self.delivered = events.len();
    }

    fn fail(mut self, error: ProvisionError) -> ProvisioningSession {
        self.session.fail(error);
        self.finish()
    }

    fn finish(mut self) -> ProvisioningSession {
        self.flush();
        self.session
    }
}
