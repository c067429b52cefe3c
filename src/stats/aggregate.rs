//! Folding pull request records into per-contributor and per-repository
//! tallies.
//!
//! Everything here is pure: inputs are records already filtered to the time
//! window, outputs are the result types in [`super::model`].

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::github::models::UNKNOWN_REPOSITORY;
use crate::github::{ContributorActivity, PullRequestRecord, UserProfile};

use super::model::{
    CodeStats, ContributorCodeStats, ContributorStats, PullRequestCounts, RepoStats, UserStats,
};

/// Logins with push or admin rights on a repository.
pub type MaintainerSet = HashSet<String>;

fn saturating_count(length: usize) -> u64 {
    u64::try_from(length).unwrap_or(u64::MAX)
}

/// Builds repository-mode statistics.
///
/// Contributors appear in descending order of total pull requests; authors
/// with equal totals keep the order in which they were first seen in
/// `records`.
#[must_use]
pub fn aggregate_repository(
    repository: &str,
    records: Vec<PullRequestRecord>,
    maintainers: &MaintainerSet,
) -> RepoStats {
    let mut contributors: Vec<ContributorStats> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for record in &records {
        let login = record.author.login.as_str();
        let position = *positions.entry(login).or_insert_with(|| {
            contributors.push(ContributorStats {
                username: login.to_owned(),
                avatar_url: record.author.avatar_url.clone(),
                counts: PullRequestCounts::default(),
                is_maintainer: maintainers.contains(login),
            });
            contributors.len() - 1
        });

        if let Some(contributor) = contributors.get_mut(position) {
            contributor.counts.record(record.outcome());
        }
    }

    contributors.sort_by(|left, right| right.counts.total_prs().cmp(&left.counts.total_prs()));

    RepoStats {
        repository: repository.to_owned(),
        total_prs: saturating_count(records.len()),
        contributors,
        recent_prs: records,
    }
}

/// Per-repository tallies of one author's pull requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileTally {
    repositories: Vec<(String, PullRequestCounts)>,
    total: PullRequestCounts,
}

impl ProfileTally {
    /// Tallies `records` by repository.
    #[must_use]
    pub fn from_records(records: &[PullRequestRecord]) -> Self {
        let mut tally = Self::default();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for record in records {
            let name = record.repository_name.as_str();
            let position = *positions.entry(name).or_insert_with(|| {
                tally
                    .repositories
                    .push((name.to_owned(), PullRequestCounts::default()));
                tally.repositories.len() - 1
            });

            let outcome = record.outcome();
            if let Some((_, counts)) = tally.repositories.get_mut(position) {
                counts.record(outcome);
            }
            tally.total.record(outcome);
        }

        tally
    }

    /// Tallies across every repository.
    #[must_use]
    pub const fn total(&self) -> PullRequestCounts {
        self.total
    }

    /// Names of the `limit` repositories with the most pull requests.
    ///
    /// Ties keep first-seen order. Records without a repository are tallied
    /// under [`UNKNOWN_REPOSITORY`] but never ranked.
    #[must_use]
    pub fn busiest(&self, limit: usize) -> Vec<&str> {
        let mut ranked: Vec<&(String, PullRequestCounts)> = self
            .repositories
            .iter()
            .filter(|(name, _)| name != UNKNOWN_REPOSITORY)
            .collect();
        ranked.sort_by(|left, right| right.1.total_prs().cmp(&left.1.total_prs()));
        ranked
            .into_iter()
            .take(limit)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Per-repository tallies keyed by `owner/repo`.
    #[must_use]
    pub fn into_repositories(self) -> BTreeMap<String, PullRequestCounts> {
        self.repositories.into_iter().collect()
    }
}

/// Builds profile-mode statistics from a finished tally.
#[must_use]
pub fn aggregate_profile(
    profile: &UserProfile,
    records: Vec<PullRequestRecord>,
    tally: ProfileTally,
    is_maintainer: bool,
) -> UserStats {
    UserStats {
        username: profile.login.clone(),
        avatar_url: profile.avatar_url.clone(),
        total_stats: tally.total(),
        repositories: tally.into_repositories(),
        pull_requests: records,
        is_maintainer,
    }
}

/// Builds contributor code statistics, ordered by descending churn.
#[must_use]
pub fn aggregate_code(repository: &str, activity: Vec<ContributorActivity>) -> CodeStats {
    let mut contributors: Vec<ContributorCodeStats> = activity
        .into_iter()
        .map(|entry| ContributorCodeStats {
            username: entry.author.login,
            avatar_url: entry.author.avatar_url,
            additions: entry.additions,
            deletions: entry.deletions,
            commits: entry.commits,
        })
        .collect();
    contributors.sort_by_key(|contributor| std::cmp::Reverse(contributor.churn()));

    let total_additions = contributors
        .iter()
        .fold(0_u64, |sum, contributor| sum.saturating_add(contributor.additions));
    let total_deletions = contributors
        .iter()
        .fold(0_u64, |sum, contributor| sum.saturating_add(contributor.deletions));

    CodeStats {
        repository: repository.to_owned(),
        contributors,
        total_additions,
        total_deletions,
    }
}
