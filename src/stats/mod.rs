//! Pull request statistics: caching, request coalescing, maintainer
//! resolution, pagination and aggregation.

pub mod aggregate;
pub mod cache;
pub mod coalescer;
pub mod fetcher;
pub mod maintainers;
pub mod model;
pub mod service;

pub use aggregate::{MaintainerSet, ProfileTally};
pub use cache::{CacheKey, ResultCache};
pub use coalescer::RequestCoalescer;
pub use maintainers::MaintainerResolver;
pub use model::{
    CodeStats, ContributorCodeStats, ContributorStats, PullRequestCounts, RepoStats, UserStats,
};
pub use service::{StatsCaches, StatsService, StatsSettings};
