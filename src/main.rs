//! `prstats` command-line entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use prstats::{OperationMode, PrStatsConfig, StatsError};
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<ExitCode, StatsError> {
    let config = load_config()?;

    match config.operation_mode() {
        OperationMode::RepositoryStats => cli::repository_stats::run(&config).await,
        OperationMode::UserStats => cli::user_stats::run(&config).await,
        OperationMode::Missing => Err(StatsError::Configuration {
            message: "nothing to do: pass --repo <owner/repo> or --user <login>".to_owned(),
        }),
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`StatsError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PrStatsConfig, StatsError> {
    PrStatsConfig::load().map_err(|error| StatsError::Configuration {
        message: error.to_string(),
    })
}
