//! Pull request and collaborator statistics for GitHub repositories and
//! accounts.
//!
//! The library wraps Octocrab to fetch pull request pages, classify
//! contributors as maintainers, and aggregate per-author counts. Results are
//! cached for a few minutes and concurrent maintainer lookups for the same
//! repository share one request.
//!
//! ```no_run
//! # async fn demo() -> Result<(), prstats::StatsError> {
//! use prstats::{OctocrabGateway, StatsService, StatsSettings, TimeFilter};
//!
//! let gateway = OctocrabGateway::for_token(None, prstats::github::DEFAULT_API_BASE)?;
//! let service = StatsService::new(gateway, StatsSettings::default());
//! let stats = service
//!     .fetch_repository_stats("acme/widgets", TimeFilter::OneMonth)
//!     .await?;
//! tracing::info!(total = stats.total_prs, "fetched repository statistics");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod github;
pub mod progress;
pub mod stats;

pub use config::{OperationMode, PrStatsConfig};
pub use github::{
    GitHubGateway, OctocrabGateway, PersonalAccessToken, RepositoryLocator, StatsError, TimeFilter,
    Username,
};
pub use progress::{FetchPhase, ProgressSink};
pub use stats::{
    CodeStats, ContributorCodeStats, ContributorStats, PullRequestCounts, RepoStats, StatsService,
    StatsSettings, UserStats,
};
