//! CLI operation mode handlers.
//!
//! - [`repository_stats`]: statistics for one repository
//! - [`user_stats`]: statistics for one GitHub account
//!
//! Output formatting utilities are in [`output`].

use std::sync::Arc;

use prstats::progress::{StderrProgressSink, TracingProgressSink};
use prstats::{OctocrabGateway, PrStatsConfig, ProgressSink, StatsError, StatsService};

pub mod output;
pub mod repository_stats;
pub mod user_stats;

#[cfg(test)]
pub mod test_utils;

/// Builds a service over the real GitHub API from configuration.
///
/// # Errors
///
/// Returns [`StatsError::Configuration`] when the numeric settings or the
/// API base URL are invalid.
pub fn build_service(config: &PrStatsConfig) -> Result<StatsService<OctocrabGateway>, StatsError> {
    let settings = config.stats_settings()?;
    let token = config.resolve_token();
    if token.is_none() {
        tracing::info!("no token configured; requests are anonymous");
    }
    let gateway = OctocrabGateway::for_token(token.as_ref(), config.api_base())?;
    Ok(StatsService::new(gateway, settings).with_progress(progress_sink(config)))
}

/// Text output reports progress on stderr; JSON output only logs it.
fn progress_sink(config: &PrStatsConfig) -> Arc<dyn ProgressSink> {
    if config.json {
        Arc::new(TracingProgressSink)
    } else {
        Arc::new(StderrProgressSink)
    }
}
