//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Receives session events from `runway_core` as they are appended and
//! prints them live, above a spinner when attached to a TTY.

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;
use runway_core::application::ProgressReporter;
use runway_core::domain::{EventLevel, LogEvent};

use crate::output::{OutputContext, Styles, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `Step` prints `"  → {message}"` and becomes the spinner message
/// - `Success` prints `"  ✓ {message}"`
/// - `Warn` prints `"  ⚠ {message}"`
/// - `Error` prints `"  ✗ {message}"` to stderr, even when `quiet`
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    spinner: Option<ProgressBar>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a reporter; a spinner is shown only on an interactive terminal.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        let spinner = ctx.show_progress().then(|| progress::spinner("starting..."));
        Self { ctx, spinner }
    }

    /// Clear the spinner. Call once the session is terminal.
    pub fn finish(&self) {
        if let Some(pb) = &self.spinner {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn emit(&self, event: &LogEvent) {
        if event.level == EventLevel::Error {
            match &self.spinner {
                Some(pb) => pb.suspend(|| self.ctx.error(&event.message)),
                None => self.ctx.error(&event.message),
            }
            return;
        }
        if self.ctx.quiet {
            return;
        }
        let line = format_event(&self.ctx.styles, event);
        match &self.spinner {
            Some(pb) => {
                pb.println(line);
                if event.level == EventLevel::Step {
                    pb.set_message(event.message.clone());
                }
            }
            None => println!("{line}"),
        }
    }
}

/// One progress line: indent, level glyph, message.
#[must_use]
pub fn format_event(styles: &Styles, event: &LogEvent) -> String {
    let glyph = match event.level {
        EventLevel::Step => "→".style(styles.step).to_string(),
        EventLevel::Success => "✓".style(styles.success).to_string(),
        EventLevel::Warn => "⚠".style(styles.warning).to_string(),
        EventLevel::Error => "✗".style(styles.error).to_string(),
    };
    format!("  {glyph} {}", event.message)
}
