//! Account statistics operation.

use std::io::{self, Write};
use std::process::ExitCode;

use prstats::{GitHubGateway, PrStatsConfig, StatsError, StatsService};

use super::build_service;
use super::output::{write_json_to, write_user_summary};

/// Prints pull request statistics for the configured account.
///
/// # Errors
///
/// Returns [`StatsError::Configuration`] if required configuration is missing,
/// or the service's error if the statistics cannot be fetched.
pub async fn run(config: &PrStatsConfig) -> Result<ExitCode, StatsError> {
    let service = build_service(config)?;
    let mut stdout = io::stdout().lock();
    run_with_service(config, &service, &mut stdout).await
}

/// Prints account statistics using the given service.
///
/// This function is exposed for testing with stub gateways.
pub async fn run_with_service<G, W>(
    config: &PrStatsConfig,
    service: &StatsService<G>,
    writer: &mut W,
) -> Result<ExitCode, StatsError>
where
    G: GitHubGateway + 'static,
    W: Write,
{
    let reference = config.user.as_deref().ok_or_else(|| StatsError::Configuration {
        message: "username is required (use --user or -u)".to_owned(),
    })?;
    let filter = config.time_filter()?;

    let stats = service.fetch_user_stats(reference, filter).await?;
    if config.json {
        write_json_to(writer, stats.as_ref())?;
    } else {
        write_user_summary(writer, &stats, filter)?;
    }
    Ok(ExitCode::SUCCESS)
}
