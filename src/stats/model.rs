//! Aggregated statistics returned to callers.
//!
//! Results are shared as `Arc`s between the cache and every caller, so they
//! are never mutated after construction.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::github::{PullRequestOutcome, PullRequestRecord};

/// Pull request tallies split by outcome.
///
/// `total_prs` always equals `merged_prs + open_prs + closed_prs`; the only
/// way to change the counts is [`PullRequestCounts::record`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PullRequestCounts {
    total_prs: u64,
    merged_prs: u64,
    open_prs: u64,
    closed_prs: u64,
}

impl PullRequestCounts {
    /// Counts one pull request with the given outcome.
    pub const fn record(&mut self, outcome: PullRequestOutcome) {
        self.total_prs += 1;
        match outcome {
            PullRequestOutcome::Merged => self.merged_prs += 1,
            PullRequestOutcome::Open => self.open_prs += 1,
            PullRequestOutcome::Closed => self.closed_prs += 1,
        }
    }

    /// All pull requests counted.
    #[must_use]
    pub const fn total_prs(&self) -> u64 {
        self.total_prs
    }

    /// Pull requests with a merge timestamp.
    #[must_use]
    pub const fn merged_prs(&self) -> u64 {
        self.merged_prs
    }

    /// Open, unmerged pull requests.
    #[must_use]
    pub const fn open_prs(&self) -> u64 {
        self.open_prs
    }

    /// Closed without being merged.
    #[must_use]
    pub const fn closed_prs(&self) -> u64 {
        self.closed_prs
    }
}

impl FromIterator<PullRequestOutcome> for PullRequestCounts {
    fn from_iter<I: IntoIterator<Item = PullRequestOutcome>>(outcomes: I) -> Self {
        let mut counts = Self::default();
        for outcome in outcomes {
            counts.record(outcome);
        }
        counts
    }
}

/// One author's share of a repository's pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributorStats {
    /// GitHub login.
    pub username: String,
    /// Avatar taken from the author's first counted pull request.
    pub avatar_url: String,
    /// Tallies for this author.
    #[serde(flatten)]
    pub counts: PullRequestCounts,
    /// Whether the author has push or admin rights on the repository.
    pub is_maintainer: bool,
}

/// Repository-mode result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoStats {
    /// Repository in `owner/repo` form.
    pub repository: String,
    /// Number of pull requests inside the time window.
    pub total_prs: u64,
    /// Contributors sorted by descending total; ties keep first-seen order.
    pub contributors: Vec<ContributorStats>,
    /// Every counted pull request, newest first.
    pub recent_prs: Vec<PullRequestRecord>,
}

/// Profile-mode result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    /// Canonical GitHub login.
    pub username: String,
    /// Avatar from the user's profile.
    pub avatar_url: String,
    /// Per-repository tallies keyed by `owner/repo`.
    pub repositories: BTreeMap<String, PullRequestCounts>,
    /// Every counted pull request, newest first.
    pub pull_requests: Vec<PullRequestRecord>,
    /// Tallies across all repositories.
    pub total_stats: PullRequestCounts,
    /// Whether the user maintains at least one of their busiest repositories.
    pub is_maintainer: bool,
}

/// One contributor's code churn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributorCodeStats {
    /// GitHub login.
    pub username: String,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Lines added across all weeks.
    pub additions: u64,
    /// Lines deleted across all weeks.
    pub deletions: u64,
    /// Commits authored.
    pub commits: u64,
}

impl ContributorCodeStats {
    /// Lines changed in either direction.
    #[must_use]
    pub const fn churn(&self) -> u64 {
        self.additions.saturating_add(self.deletions)
    }
}

/// Contributor code statistics for a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeStats {
    /// Repository in `owner/repo` form.
    pub repository: String,
    /// Contributors sorted by descending churn.
    pub contributors: Vec<ContributorCodeStats>,
    /// Sum of all additions.
    pub total_additions: u64,
    /// Sum of all deletions.
    pub total_deletions: u64,
}
