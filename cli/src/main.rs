//! Runway CLI - Ephemeral environments provisioned through hosted pipelines

use std::process::ExitCode;

use clap::Parser;
use runway_cli::cli::Cli;
use runway_cli::output::json::format_error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            match format_error(&format!("{e:#}"), "cli_error") {
                Ok(body) if json => println!("{body}"),
                _ => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
