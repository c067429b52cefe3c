//! User-scoped endpoints: authored pull request search and public profiles.

use crate::github::error::StatsError;
use crate::github::locator::Username;
use crate::github::models::{ApiSearchResults, ApiUserProfile, PullRequestRecord, UserProfile};
use crate::github::pagination::PageRequest;

use super::OctocrabGateway;
use super::http_utils::author_pull_request_query;

impl OctocrabGateway {
    pub(super) async fn fetch_search_page(
        &self,
        author: &Username,
        page: PageRequest,
    ) -> Result<Vec<PullRequestRecord>, StatsError> {
        let query = author_pull_request_query(author.as_str());
        let page_str = page.page().to_string();
        let per_page_str = page.per_page().to_string();

        let query_params = [
            ("q", query.as_str()),
            ("sort", "created"),
            ("order", "desc"),
            ("per_page", per_page_str.as_str()),
            ("page", page_str.as_str()),
        ];

        let results: ApiSearchResults =
            match self.client.get("/search/issues", Some(&query_params)).await {
                Ok(results) => results,
                Err(error) => {
                    return Err(self
                        .map_octocrab_error_with_rate_limit(
                            &format!("search pull requests by {author}"),
                            &error,
                        )
                        .await);
                }
            };

        Ok(results
            .items
            .into_iter()
            .map(PullRequestRecord::from)
            .collect())
    }

    pub(super) async fn fetch_user_profile(
        &self,
        username: &Username,
    ) -> Result<UserProfile, StatsError> {
        let profile: ApiUserProfile = match self
            .client
            .get(username.profile_path(), None::<&()>)
            .await
        {
            Ok(profile) => profile,
            Err(error) => {
                return Err(self
                    .map_octocrab_error_with_rate_limit(&format!("user {username}"), &error)
                    .await);
            }
        };

        Ok(profile.into())
    }
}
