//! RetryLab - retry engine verification CLI
//!
//! Main entry point for the `retrylab` binary.

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use retrylab_api::{commands, AppContext};
use retrylab_domain::RunTestRequest;
use retrylab_infra::{init_tracing, LogFormat};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "retrylab", version, about = "Retry-with-backoff verification harness")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the scenario sweep and write its reports
    Run {
        /// Run identifier; generated when omitted
        #[arg(long)]
        run_id: Option<String>,
        /// Only run scenarios of this type (rate_limit, server_error,
        /// client_error, network_error)
        #[arg(long = "type", value_name = "TYPE")]
        scenario_type: Option<String>,
        /// Credential for a live API; never written to artifacts
        #[arg(long, env = "RETRYLAB_API_KEY", hide_env_values = true)]
        credential: Option<String>,
    },
    /// Print the test report (or quality report) of a run
    Report {
        run_id: String,
        #[arg(long)]
        quality: bool,
    },
    /// List the scenario catalogue
    Scenarios,
    /// List runs with persisted reports
    Runs,
    /// Print the effective retry policy
    Policy,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env before anything reads the environment
    let dotenv = dotenvy::dotenv();

    init_tracing(LogFormat::from_env())?;
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) => tracing::debug!(error = %e, "No .env file loaded"),
    }

    let cli = Cli::parse();
    let ctx = AppContext::new();

    match cli.command {
        Command::Run { run_id, scenario_type, credential } => {
            let request = RunTestRequest { run_id, scenario_type, credential_override: credential };
            let response = commands::run_test(&ctx, request).await;
            print_json(&response)?;
            if !response.success {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Report { run_id, quality } => {
            if quality {
                print_json(&commands::get_quality_report(&ctx, &run_id).await?)?;
            } else {
                print_json(&commands::get_report(&ctx, &run_id).await?)?;
            }
        }
        Command::Scenarios => print_json(&commands::list_scenarios(&ctx))?,
        Command::Runs => print_json(&commands::list_runs(&ctx).await?)?,
        Command::Policy => print_json(&commands::get_policy(&ctx))?,
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_arguments() {
        let cli = Cli::parse_from(["retrylab", "run", "--run-id", "run-1", "--type", "rate_limit"]);
        match cli.command {
            Command::Run { run_id, scenario_type, .. } => {
                assert_eq!(run_id.as_deref(), Some("run-1"));
                assert_eq!(scenario_type.as_deref(), Some("rate_limit"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_report_arguments() {
        let cli = Cli::parse_from(["retrylab", "report", "run-1", "--quality"]);
        assert!(matches!(cli.command, Command::Report { quality: true, .. }));
    }
}
