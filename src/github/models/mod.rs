//! Data models for pull requests, collaborators, and profiles.
//!
//! Types prefixed with `Api` are internal deserialisation targets. They
//! convert into the public domain types with explicit fallbacks for every
//! field GitHub may omit, so aggregation never has to branch on a missing
//! value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login used when a pull request has no author (deleted accounts).
pub const UNKNOWN_USER: &str = "unknown-user";

/// Avatar used when GitHub does not report one.
pub const PLACEHOLDER_AVATAR_URL: &str = "https://github.com/identicons/placeholder.png";

/// Repository name used when a search result carries no repository URL.
pub const UNKNOWN_REPOSITORY: &str = "unknown/unknown";

/// State of a pull request as reported by GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestState {
    /// Still open.
    Open,
    /// Closed, merged or not.
    Closed,
    /// GitHub omitted the state.
    Unknown,
}

impl PullRequestState {
    fn from_api(value: Option<&str>) -> Self {
        match value {
            Some(state) if state.eq_ignore_ascii_case("open") => Self::Open,
            Some(state) if state.eq_ignore_ascii_case("closed") => Self::Closed,
            _ => Self::Unknown,
        }
    }
}

/// Mutually exclusive classification of a pull request for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestOutcome {
    /// A merge timestamp is present.
    Merged,
    /// Open and not merged.
    Open,
    /// Anything else, including an unknown state.
    Closed,
}

/// Author of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestAuthor {
    /// GitHub login.
    pub login: String,
    /// Avatar image URL.
    pub avatar_url: String,
}

impl PullRequestAuthor {
    fn from_api(api_user: Option<ApiUser>) -> Self {
        let user = api_user.unwrap_or_default();
        Self {
            login: user.login.unwrap_or_else(|| UNKNOWN_USER.to_owned()),
            avatar_url: user
                .avatar_url
                .unwrap_or_else(|| PLACEHOLDER_AVATAR_URL.to_owned()),
        }
    }
}

/// Normalised pull request as consumed by aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestRecord {
    /// Pull request number within its repository.
    pub number: u64,
    /// Title, or `Pull Request #<number>` when GitHub omitted it.
    pub title: String,
    /// Reported state.
    pub state: PullRequestState,
    /// Creation time; the Unix epoch when GitHub omitted it.
    pub created_at: DateTime<Utc>,
    /// Merge time, if the pull request was merged.
    pub merged_at: Option<DateTime<Utc>>,
    /// Browser URL, or an empty string.
    pub url: String,
    /// `owner/repo` of the repository the pull request belongs to.
    pub repository_name: String,
    /// Pull request author.
    pub author: PullRequestAuthor,
}

impl PullRequestRecord {
    /// Classifies the record as merged, open, or closed.
    #[must_use]
    pub const fn outcome(&self) -> PullRequestOutcome {
        if self.merged_at.is_some() {
            PullRequestOutcome::Merged
        } else if matches!(self.state, PullRequestState::Open) {
            PullRequestOutcome::Open
        } else {
            PullRequestOutcome::Closed
        }
    }

    /// Returns true when the record was created strictly after `start`.
    #[must_use]
    pub fn created_after(&self, start: DateTime<Utc>) -> bool {
        self.created_at > start
    }
}

fn fallback_title(number: u64, title: Option<String>) -> String {
    title
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| format!("Pull Request #{number}"))
}

/// Repository collaborator and the permissions GitHub reports for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collaborator {
    /// GitHub login.
    pub login: String,
    /// Whether the collaborator may push.
    pub push: bool,
    /// Whether the collaborator administers the repository.
    pub admin: bool,
}

impl Collaborator {
    /// Returns true for collaborators with push or admin permission.
    #[must_use]
    pub const fn is_maintainer(&self) -> bool {
        self.push || self.admin
    }
}

/// Public profile of a GitHub user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Canonical login as reported by GitHub.
    pub login: String,
    /// Avatar image URL.
    pub avatar_url: String,
}

/// Lifetime code activity of one contributor to a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributorActivity {
    /// Contributor identity.
    pub author: PullRequestAuthor,
    /// Lines added across all weeks.
    pub additions: u64,
    /// Lines deleted across all weeks.
    pub deletions: u64,
    /// Total commits.
    pub commits: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
    pub(super) avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    pub(super) title: Option<String>,
    pub(super) state: Option<String>,
    pub(super) created_at: Option<DateTime<Utc>>,
    pub(super) merged_at: Option<DateTime<Utc>>,
    pub(super) html_url: Option<String>,
    pub(super) user: Option<ApiUser>,
}

impl ApiPullRequest {
    pub(super) fn into_record(self, repository_name: &str) -> PullRequestRecord {
        PullRequestRecord {
            number: self.number,
            title: fallback_title(self.number, self.title),
            state: PullRequestState::from_api(self.state.as_deref()),
            created_at: self.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            merged_at: self.merged_at,
            url: self.html_url.unwrap_or_default(),
            repository_name: repository_name.to_owned(),
            author: PullRequestAuthor::from_api(self.user),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct ApiSearchResults {
    #[serde(default)]
    pub(super) items: Vec<ApiSearchIssue>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiSearchIssue {
    pub(super) number: u64,
    pub(super) title: Option<String>,
    pub(super) state: Option<String>,
    pub(super) created_at: Option<DateTime<Utc>>,
    pub(super) html_url: Option<String>,
    pub(super) repository_url: Option<String>,
    pub(super) pull_request: Option<ApiPullRequestLink>,
    pub(super) user: Option<ApiUser>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct ApiPullRequestLink {
    pub(super) merged_at: Option<DateTime<Utc>>,
}

/// Extracts `owner/repo` from an API repository URL such as
/// `https://api.github.com/repos/owner/repo`.
fn repository_name_from_url(url: Option<&str>) -> String {
    url.and_then(|value| value.split_once("/repos/"))
        .map(|(_, name)| name.trim_end_matches('/'))
        .filter(|name| name.contains('/'))
        .map_or_else(|| UNKNOWN_REPOSITORY.to_owned(), ToOwned::to_owned)
}

impl From<ApiSearchIssue> for PullRequestRecord {
    fn from(value: ApiSearchIssue) -> Self {
        Self {
            number: value.number,
            title: fallback_title(value.number, value.title),
            state: PullRequestState::from_api(value.state.as_deref()),
            created_at: value.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            merged_at: value.pull_request.and_then(|link| link.merged_at),
            url: value.html_url.unwrap_or_default(),
            repository_name: repository_name_from_url(value.repository_url.as_deref()),
            author: PullRequestAuthor::from_api(value.user),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct ApiPermissions {
    #[serde(default)]
    pub(super) push: bool,
    #[serde(default)]
    pub(super) admin: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCollaborator {
    pub(super) login: String,
    #[serde(default)]
    pub(super) permissions: Option<ApiPermissions>,
}

impl From<ApiCollaborator> for Collaborator {
    fn from(value: ApiCollaborator) -> Self {
        let permissions = value.permissions.unwrap_or_default();
        Self {
            login: value.login,
            push: permissions.push,
            admin: permissions.admin,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUserProfile {
    pub(super) login: String,
    pub(super) avatar_url: Option<String>,
}

impl From<ApiUserProfile> for UserProfile {
    fn from(value: ApiUserProfile) -> Self {
        Self {
            login: value.login,
            avatar_url: value
                .avatar_url
                .unwrap_or_else(|| PLACEHOLDER_AVATAR_URL.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct ApiContributorWeek {
    #[serde(default)]
    pub(super) a: u64,
    #[serde(default)]
    pub(super) d: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiContributorActivity {
    #[serde(default)]
    pub(super) total: u64,
    pub(super) author: Option<ApiUser>,
    #[serde(default)]
    pub(super) weeks: Vec<ApiContributorWeek>,
}

impl From<ApiContributorActivity> for ContributorActivity {
    fn from(value: ApiContributorActivity) -> Self {
        let (additions, deletions) = value
            .weeks
            .iter()
            .fold((0_u64, 0_u64), |(added, deleted), week| {
                (added.saturating_add(week.a), deleted.saturating_add(week.d))
            });
        Self {
            author: PullRequestAuthor::from_api(value.author),
            additions,
            deletions,
            commits: value.total,
        }
    }
}
