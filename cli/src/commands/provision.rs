//! `runway provision`: run one provisioning session from the terminal.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use runway_core::api::{DeliveryMode, ProvisionRequest, ResponseStatus};
use runway_core::application::services::{NoopReporter, render_batch, run_session};
use runway_core::domain::{ProvisionConfig, SessionSettings, Visibility};
use runway_core::infra::descriptor::load_descriptor;
use runway_core::infra::github::GithubConnector;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::output::TerminalReporter;

/// Exit code when the result did not appear within the polling budget.
pub const EXIT_PENDING: u8 = 2;

/// Arguments for `runway provision`.
#[derive(Args, Default)]
pub struct ProvisionArgs {
    /// Platform access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Visibility of the created repository
    #[arg(long, value_enum)]
    pub visibility: Option<Visibility>,

    /// Maximum number of reads of the result file
    #[arg(long, value_name = "N")]
    pub attempts: Option<u32>,

    /// Seconds between reads of the result file
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Custom pipeline descriptor to deploy
    #[arg(long, value_name = "FILE")]
    pub descriptor: Option<PathBuf>,

    /// Base URL of the platform REST API
    #[arg(long, value_name = "URL", hide = true)]
    pub api_url: Option<String>,
}

impl ProvisionArgs {
    /// Overlay command-line flags on the stored configuration.
    pub fn apply(&self, config: &mut ProvisionConfig) {
        if let Some(attempts) = self.attempts {
            config.poll.attempts = attempts;
        }
        if let Some(interval) = self.interval {
            config.poll.interval_secs = interval;
        }
        if let Some(descriptor) = &self.descriptor {
            config.descriptor_file = Some(descriptor.clone());
        }
        if let Some(api_url) = &self.api_url {
            config.api_url.clone_from(api_url);
        }
    }
}

/// Map a terminal status onto the process exit code.
#[must_use]
pub fn exit_code(status: ResponseStatus) -> ExitCode {
    match status {
        ResponseStatus::Success => ExitCode::SUCCESS,
        ResponseStatus::Pending => ExitCode::from(EXIT_PENDING),
        ResponseStatus::Error => ExitCode::FAILURE,
    }
}

/// Run the provision command.
///
/// Session failures are reported as an outcome and exit code, not as `Err`.
///
/// # Errors
///
/// Returns an error if the configuration or descriptor cannot be loaded.
pub async fn run(app: &AppContext, args: ProvisionArgs) -> Result<ExitCode> {
    let mut config = config_service::load_config(&app.config_store)?;
    args.apply(&mut config);
    config.validate().context("invalid provisioning options")?;

    let descriptor = load_descriptor(config.descriptor_file.as_deref())?;
    let settings = SessionSettings::from_config(&config, descriptor);
    let connector = GithubConnector::new(&config.api_url)?;

    let request = ProvisionRequest {
        credential: args.token,
        mode: Some(if app.is_json() {
            DeliveryMode::Batch
        } else {
            DeliveryMode::Stream
        }),
        visibility: args.visibility,
    };

    let session = if app.is_json() {
        run_session(&connector, &request, &settings, &NoopReporter).await
    } else {
        let reporter = TerminalReporter::new(&app.output);
        let session = run_session(&connector, &request, &settings, &reporter).await;
        reporter.finish();
        session
    };

    let response = render_batch(&session);
    app.renderer().render_outcome(&response)?;
    Ok(exit_code(response.status))
}
