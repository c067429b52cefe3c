//! Gateways for reading pull request and collaborator data through Octocrab.
//!
//! [`GitHubGateway`] is the seam between the statistics engine and the
//! network. The engine only ever sees domain records; the Octocrab
//! implementation owns the wire types, query parameters and error mapping.

mod client;
mod error_mapping;
mod http_utils;
mod octocrab_gateway;
mod repository;
mod users;

pub use octocrab_gateway::{DEFAULT_API_BASE, OctocrabGateway};

use async_trait::async_trait;

use crate::github::error::StatsError;
use crate::github::locator::{RepositoryLocator, Username};
use crate::github::models::{Collaborator, ContributorActivity, PullRequestRecord, UserProfile};
use crate::github::pagination::PageRequest;

/// Read-only access to the GitHub endpoints used for statistics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubGateway: Send + Sync {
    /// Lists one page of a repository's pull requests in every state,
    /// newest first.
    async fn list_pull_requests(
        &self,
        locator: &RepositoryLocator,
        page: PageRequest,
    ) -> Result<Vec<PullRequestRecord>, StatsError>;

    /// Lists one page of pull requests authored by `author` across all
    /// repositories, newest first.
    async fn search_pull_requests(
        &self,
        author: &Username,
        page: PageRequest,
    ) -> Result<Vec<PullRequestRecord>, StatsError>;

    /// Lists the repository's collaborators with their permissions.
    async fn list_collaborators(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<Collaborator>, StatsError>;

    /// Fetches a user's public profile.
    async fn user_profile(&self, username: &Username) -> Result<UserProfile, StatsError>;

    /// Fetches per-contributor commit activity.
    ///
    /// Returns an empty list while GitHub is still computing the numbers.
    async fn contributor_activity(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<ContributorActivity>, StatsError>;
}
