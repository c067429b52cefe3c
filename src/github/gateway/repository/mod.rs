//! Repository-scoped endpoints: pull request listings, collaborators and
//! contributor activity.

use http::{StatusCode, Uri};

use crate::github::error::StatsError;
use crate::github::locator::RepositoryLocator;
use crate::github::models::{
    ApiCollaborator, ApiContributorActivity, ApiPullRequest, Collaborator, ContributorActivity,
    PullRequestRecord,
};
use crate::github::pagination::{MAX_PER_PAGE, PageRequest};

use super::OctocrabGateway;
use super::error_mapping::{map_http_error, map_octocrab_error};
use super::http_utils::extract_github_message;

impl OctocrabGateway {
    pub(super) async fn fetch_pull_request_page(
        &self,
        locator: &RepositoryLocator,
        page: PageRequest,
    ) -> Result<Vec<PullRequestRecord>, StatsError> {
        let page_str = page.page().to_string();
        let per_page_str = page.per_page().to_string();

        let query_params = [
            ("state", "all"),
            ("sort", "created"),
            ("direction", "desc"),
            ("per_page", per_page_str.as_str()),
            ("page", page_str.as_str()),
        ];

        let pulls: Vec<ApiPullRequest> = match self
            .client
            .get(locator.pulls_path(), Some(&query_params))
            .await
        {
            Ok(pulls) => pulls,
            Err(error) => {
                return Err(self
                    .map_octocrab_error_with_rate_limit(
                        &format!("list pulls for {locator}"),
                        &error,
                    )
                    .await);
            }
        };

        let repository_name = locator.full_name();
        Ok(pulls
            .into_iter()
            .map(|pull| pull.into_record(&repository_name))
            .collect())
    }

    pub(super) async fn fetch_collaborators(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<Collaborator>, StatsError> {
        let per_page_str = MAX_PER_PAGE.to_string();
        let query_params = [("affiliation", "all"), ("per_page", per_page_str.as_str())];

        let collaborators: Vec<ApiCollaborator> = match self
            .client
            .get(locator.collaborators_path(), Some(&query_params))
            .await
        {
            Ok(collaborators) => collaborators,
            Err(error) => {
                return Err(self
                    .map_octocrab_error_with_rate_limit(
                        &format!("list collaborators for {locator}"),
                        &error,
                    )
                    .await);
            }
        };

        Ok(collaborators.into_iter().map(Collaborator::from).collect())
    }

    /// GitHub answers `202 Accepted` while contributor statistics are being
    /// computed, so the raw response is inspected instead of letting Octocrab
    /// treat every non-200 status as an error.
    pub(super) async fn fetch_contributor_activity(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<ContributorActivity>, StatsError> {
        let operation = format!("contributor statistics for {locator}");
        let uri: Uri = locator
            .contributor_stats_path()
            .parse::<Uri>()
            .map_err(|error| StatsError::invalid_reference(&locator.full_name(), error.to_string()))?;

        let response = self
            .client
            ._get_with_headers(uri, None)
            .await
            .map_err(|error| map_octocrab_error(&operation, &error))?;

        match response.status() {
            StatusCode::ACCEPTED | StatusCode::NO_CONTENT => {
                tracing::debug!(repository = %locator, "contributor statistics not ready yet");
                Ok(Vec::new())
            }
            StatusCode::OK => {
                let body = self
                    .client
                    .body_to_string(response)
                    .await
                    .map_err(|error| StatsError::Api {
                        message: format!("{operation} response decode failed: {error}"),
                    })?;

                let activity: Vec<ApiContributorActivity> =
                    serde_json::from_str(&body).map_err(|error| StatsError::Api {
                        message: format!("{operation} deserialisation failed: {error}"),
                    })?;

                Ok(activity.into_iter().map(ContributorActivity::from).collect())
            }
            status => {
                let body = self
                    .client
                    .body_to_string(response)
                    .await
                    .unwrap_or_else(|_| String::new());

                Err(map_http_error(
                    &operation,
                    status,
                    extract_github_message(&body),
                ))
            }
        }
    }
}
