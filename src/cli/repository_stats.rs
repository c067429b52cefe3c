//! Repository statistics operation.

use std::io::{self, Write};
use std::process::ExitCode;

use prstats::{GitHubGateway, PrStatsConfig, StatsError, StatsService};
use serde::Serialize;

use super::build_service;
use super::output::{io_error, write_code_summary, write_json_to, write_repository_summary};

/// Prints pull request statistics for the configured repository.
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

#[derive(Serialize)]
struct RepositoryReport<'a> {
    #[serde(flatten)]
    stats: &'a prstats::RepoStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_stats: Option<&'a prstats::CodeStats>,
}

/// Prints repository statistics using the given service.
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
    let reference = config.repo.as_deref().ok_or_else(|| StatsError::Configuration {
        message: "repository is required (use --repo or -r)".to_owned(),
    })?;
    let filter = config.time_filter()?;

    let stats = service.fetch_repository_stats(reference, filter).await?;
    if stats.contributors.is_empty() {
        writeln!(
            writer,
            "No pull request data found for {} in the selected period ({filter}).",
            stats.repository
        )
        .map_err(|e| io_error(&e))?;
        return Ok(ExitCode::FAILURE);
    }

    // Code statistics are optional enrichment; a failure is logged, not
    // reported.
    let code_stats = if config.code_stats {
        match service.fetch_code_stats(reference).await {
            Ok(code) => Some(code),
            Err(error) => {
                tracing::warn!(repository = reference, "code statistics unavailable: {error}");
                None
            }
        }
    } else {
        None
    };

    if config.json {
        let report = RepositoryReport {
            stats: &stats,
            code_stats: code_stats.as_deref(),
        };
        write_json_to(writer, &report)?;
    } else {
        write_repository_summary(writer, &stats, filter)?;
        if let Some(code) = &code_stats {
            write_code_summary(writer, code)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
