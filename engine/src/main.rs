// Session Report Generator
// Main entry point for the session-report binary

use clap::Parser;
use sdk::errors::{ReportError, ReportErrorExt};
use session_report::cli::Cli;
use session_report::config::Config;
use session_report::handlers::{generate_report, print_summary};
use session_report::telemetry::init_telemetry_with_level;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config is read before telemetry so its log level can apply
    let loaded = Config::load_from_path(&cli.config);
    let level = cli
        .log
        .clone()
        .or_else(|| loaded.as_ref().ok().map(|c| c.system.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    init_telemetry_with_level(&level);

    let version = env!("CARGO_PKG_VERSION");
    let commit = env!("GIT_COMMIT_HASH");
    let timestamp = env!("BUILD_TIMESTAMP");

    tracing::info!("Session Report v{} ({} - {})", version, commit, timestamp);

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => return fail(&anyhow::Error::from(e)),
    };
    cli.apply_overrides(&mut config);

    tracing::info!("Generating report for group '{}'", cli.group);

    match generate_report(&cli.request(), &config).await {
        Ok(outcome) => {
            print_summary(&outcome);
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => fail(&e),
    }
}

fn fail(error: &anyhow::Error) -> ExitCode {
    tracing::error!("{:#}", error);
    eprintln!("Error: {:#}", error);
    if let Some(hint) = error.downcast_ref::<ReportError>().map(|e| e.user_hint()) {
        eprintln!("Hint: {}", hint);
    }
    ExitCode::FAILURE
}
