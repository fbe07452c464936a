//! Human-readable renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;
use runway_core::api::{ProvisionResponse, ResponseStatus};
use runway_core::domain::{ProvisionConfig, ProvisionError};

use crate::infra::config::CONFIG_ENV;
use crate::output::OutputContext;

/// Terminal renderer for command results.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        println!("runway {version}");
    }

    /// Summarise a finished session.
    ///
    /// Progress lines have already been printed by the reporter; with
    /// `--quiet` a successful run prints only the URL, for scripting.
    pub fn render_outcome(&self, response: &ProvisionResponse) {
        match response.status {
            ResponseStatus::Success => {
                let url = response.url.as_deref().unwrap_or_default();
                if self.ctx.quiet {
                    println!("{url}");
                    return;
                }
                println!();
                self.ctx.success("Environment ready");
                self.ctx.kv("repository:", &response.repo);
                self.ctx
                    .kv("url:       ", &url.style(self.ctx.styles.link).to_string());
            }
            ResponseStatus::Pending => {
                println!();
                self.ctx
                    .warn("Result not published yet; the pipeline may still be starting");
                self.ctx.kv("repository:", &response.repo);
            }
            ResponseStatus::Error => {
                let missing = ProvisionError::MissingCredential.to_string();
                if response.error.as_deref() == Some(missing.as_str()) {
                    self.ctx.info("Pass --token or set GITHUB_TOKEN");
                }
            }
        }
    }

    /// Render the effective configuration and where it is stored.
    pub fn render_config(&self, config: &ProvisionConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        let descriptor = config
            .descriptor_file
            .as_deref()
            .map_or_else(|| "(embedded)".to_string(), |p| p.display().to_string());
        for (key, value) in [
            ("api_url:", config.api_url.clone()),
            ("visibility:", config.visibility.to_string()),
            ("branch:", config.layout.branch.clone()),
            ("poll.attempts:", config.poll.attempts.to_string()),
            ("poll.interval_secs:", config.poll.interval_secs.to_string()),
            ("descriptor_file:", descriptor),
        ] {
            println!("  {key:<20} {value}");
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.header));
        println!(
            "  {:<20} {}",
            format!("{CONFIG_ENV}:"),
            std::env::var(CONFIG_ENV).unwrap_or_else(|_| "(unset)".to_string())
        );
        println!();
    }
}
