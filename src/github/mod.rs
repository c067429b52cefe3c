//! GitHub access for pull request statistics.
//!
//! This module parses repository and user references, wraps Octocrab behind
//! the [`GitHubGateway`] trait, and normalises REST responses into the
//! records that aggregation consumes. Errors are mapped into [`StatsError`]
//! variants so callers can report precise failures without seeing Octocrab
//! internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod rate_limit;
pub mod time_filter;

pub use error::StatsError;
pub use gateway::{DEFAULT_API_BASE, GitHubGateway, OctocrabGateway};
pub use locator::{PersonalAccessToken, RepositoryLocator, RepositoryName, RepositoryOwner, Username};
pub use models::{
    Collaborator, ContributorActivity, PullRequestAuthor, PullRequestOutcome, PullRequestRecord,
    PullRequestState, UserProfile,
};
pub use pagination::{PageRequest, PaginationPolicy};
pub use rate_limit::RateLimitInfo;
pub use time_filter::TimeFilter;

#[cfg(test)]
pub use gateway::MockGitHubGateway;

#[cfg(test)]
mod tests;
