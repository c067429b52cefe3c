//! Octocrab-backed implementation of [`GitHubGateway`].

use async_trait::async_trait;
use chrono::Utc;
use octocrab::Octocrab;

use crate::github::error::StatsError;
use crate::github::locator::{PersonalAccessToken, RepositoryLocator, Username};
use crate::github::models::{Collaborator, ContributorActivity, PullRequestRecord, UserProfile};
use crate::github::pagination::PageRequest;
use crate::github::rate_limit::RateLimitInfo;

use super::GitHubGateway;
use super::client::build_octocrab_client;
use super::error_mapping::{is_rate_limit_error, map_octocrab_error};

/// Public GitHub REST API root.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Gateway that talks to the GitHub REST API through Octocrab.
pub struct OctocrabGateway {
    pub(super) client: Octocrab,
}

impl OctocrabGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the optional token and API base URL.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Configuration` when the base URI cannot be parsed
    /// or `StatsError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: Option<&PersonalAccessToken>,
        api_base: &str,
    ) -> Result<Self, StatsError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }

    pub(super) async fn map_octocrab_error_with_rate_limit(
        &self,
        operation: &str,
        error: &octocrab::Error,
    ) -> StatsError {
        match error {
            octocrab::Error::GitHub { source, .. } if is_rate_limit_error(source) => {
                let rate_limit = self.fetch_rate_limit_info().await;
                let base_message =
                    format!("{operation} failed: {message}", message = source.message);
                let message = match &rate_limit {
                    Some(info) => format!("{base_message} ({})", info.retry_hint(Utc::now())),
                    None => base_message,
                };

                StatsError::RateLimitExceeded {
                    rate_limit,
                    message,
                }
            }
            _ => map_octocrab_error(operation, error),
        }
    }

    async fn fetch_rate_limit_info(&self) -> Option<RateLimitInfo> {
        let rate = self.client.ratelimit().get().await.ok()?.rate;
        let Ok(limit) = u32::try_from(rate.limit) else {
            return None;
        };
        let Ok(remaining) = u32::try_from(rate.remaining) else {
            return None;
        };
        Some(RateLimitInfo::new(limit, remaining, rate.reset))
    }
}

impl std::fmt::Debug for OctocrabGateway {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("OctocrabGateway").finish_non_exhaustive()
    }
}

#[async_trait]
impl GitHubGateway for OctocrabGateway {
    async fn list_pull_requests(
        &self,
        locator: &RepositoryLocator,
        page: PageRequest,
    ) -> Result<Vec<PullRequestRecord>, StatsError> {
        self.fetch_pull_request_page(locator, page).await
    }

    async fn search_pull_requests(
        &self,
        author: &Username,
        page: PageRequest,
    ) -> Result<Vec<PullRequestRecord>, StatsError> {
        self.fetch_search_page(author, page).await
    }

    async fn list_collaborators(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<Collaborator>, StatsError> {
        self.fetch_collaborators(locator).await
    }

    async fn user_profile(&self, username: &Username) -> Result<UserProfile, StatsError> {
        self.fetch_user_profile(username).await
    }

    async fn contributor_activity(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<ContributorActivity>, StatsError> {
        self.fetch_contributor_activity(locator).await
    }
}
