//! Stub gateway shared by CLI handler tests.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use prstats::github::{
    Collaborator, ContributorActivity, PageRequest, PullRequestAuthor, PullRequestRecord,
    PullRequestState, UserProfile,
};
use prstats::{GitHubGateway, RepositoryLocator, StatsError, StatsService, StatsSettings, Username};

/// Serves canned data; every listing fits on the first page.
#[derive(Debug, Clone)]
pub struct StubGateway {
    /// Served by the repository listing.
    pub pull_requests: Vec<PullRequestRecord>,
    /// Served by the author search.
    pub search_results: Vec<PullRequestRecord>,
    /// Returned by the collaborator listing.
    pub collaborators: Result<Vec<Collaborator>, StatsError>,
    /// Returned by the contributor statistics endpoint.
    pub activity: Result<Vec<ContributorActivity>, StatsError>,
}

impl Default for StubGateway {
    fn default() -> Self {
        Self {
            pull_requests: Vec::new(),
            search_results: Vec::new(),
            collaborators: Ok(Vec::new()),
            activity: Ok(Vec::new()),
        }
    }
}

fn first_page(records: &[PullRequestRecord], page: PageRequest) -> Vec<PullRequestRecord> {
    if page.is_first_page() {
        records.to_vec()
    } else {
        Vec::new()
    }
}

#[async_trait]
impl GitHubGateway for StubGateway {
    async fn list_pull_requests(
        &self,
        _locator: &RepositoryLocator,
        page: PageRequest,
    ) -> Result<Vec<PullRequestRecord>, StatsError> {
        Ok(first_page(&self.pull_requests, page))
    }

    async fn search_pull_requests(
        &self,
        _username: &Username,
        page: PageRequest,
    ) -> Result<Vec<PullRequestRecord>, StatsError> {
        Ok(first_page(&self.search_results, page))
    }

    async fn list_collaborators(
        &self,
        _locator: &RepositoryLocator,
    ) -> Result<Vec<Collaborator>, StatsError> {
        self.collaborators.clone()
    }

    async fn user_profile(&self, username: &Username) -> Result<UserProfile, StatsError> {
        Ok(UserProfile {
            login: username.as_str().to_ascii_lowercase(),
            avatar_url: format!("https://avatars.example/{username}"),
        })
    }

    async fn contributor_activity(
        &self,
        _locator: &RepositoryLocator,
    ) -> Result<Vec<ContributorActivity>, StatsError> {
        self.activity.clone()
    }
}

pub fn service(gateway: StubGateway) -> StatsService<StubGateway> {
    StatsService::new(gateway, StatsSettings::default())
}

pub fn record(number: u64, login: &str, merged: bool) -> PullRequestRecord {
    let created_at = Utc::now() - Duration::days(1);
    PullRequestRecord {
        number,
        title: format!("Change {number}"),
        state: if merged {
            PullRequestState::Closed
        } else {
            PullRequestState::Open
        },
        created_at,
        merged_at: merged.then_some(created_at),
        url: format!("https://github.com/acme/widgets/pull/{number}"),
        repository_name: "acme/widgets".to_owned(),
        author: PullRequestAuthor {
            login: login.to_owned(),
            avatar_url: String::new(),
        },
    }
}

pub fn collaborator(login: &str, push: bool) -> Collaborator {
    Collaborator {
        login: login.to_owned(),
        push,
        admin: false,
    }
}

pub fn activity(login: &str, additions: u64, deletions: u64, commits: u64) -> ContributorActivity {
    ContributorActivity {
        author: PullRequestAuthor {
            login: login.to_owned(),
            avatar_url: String::new(),
        },
        additions,
        deletions,
        commits,
    }
}
