//! Entry points that turn a raw reference into cached statistics.
//!
//! [`StatsService`] ties the pieces together: parse the reference, consult
//! the result cache, resolve maintainers, walk the paginated listing,
//! aggregate, and cache. Each phase is reported to the injected
//! [`ProgressSink`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;

use crate::github::{
    GitHubGateway, PaginationPolicy, PullRequestAuthor, RepositoryLocator, StatsError,
    TimeFilter, Username,
};
use crate::progress::{FetchPhase, NoopProgressSink, ProgressSink};

use super::aggregate::{ProfileTally, aggregate_code, aggregate_profile, aggregate_repository};
use super::cache::{CacheKey, DEFAULT_MAINTAINER_TTL, DEFAULT_RESULT_TTL, ResultCache};
use super::coalescer::DEFAULT_COALESCE_GRACE;
use super::fetcher::collect_windowed;
use super::maintainers::{MaintainerCache, MaintainerRequests, MaintainerResolver};
use super::model::{CodeStats, RepoStats, UserStats};

/// Number of a user's busiest repositories checked for maintainer rights.
pub const DEFAULT_MAINTAINER_CHECK_LIMIT: usize = 3;

/// Tunables for a [`StatsService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSettings {
    /// Lifetime of cached statistics.
    pub result_ttl: Duration,
    /// Lifetime of cached maintainer sets.
    pub maintainer_ttl: Duration,
    /// How long a settled maintainer lookup stays joinable.
    pub coalesce_grace: Duration,
    /// Paging limits for repository listings.
    pub repository_pages: PaginationPolicy,
    /// Paging limits for the author search.
    pub search_pages: PaginationPolicy,
    /// How many of a user's busiest repositories are checked for
    /// maintainer rights.
    pub maintainer_check_limit: usize,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            result_ttl: DEFAULT_RESULT_TTL,
            maintainer_ttl: DEFAULT_MAINTAINER_TTL,
            coalesce_grace: DEFAULT_COALESCE_GRACE,
            repository_pages: PaginationPolicy::repository_listing(),
            search_pages: PaginationPolicy::search(),
            maintainer_check_limit: DEFAULT_MAINTAINER_CHECK_LIMIT,
        }
    }
}

/// Caches owned by a service. Share one instance between services to share
/// results and in-flight maintainer lookups.
#[derive(Debug)]
pub struct StatsCaches {
    /// Repository-mode results.
    pub repositories: ResultCache<CacheKey, Arc<RepoStats>>,
    /// Profile-mode results.
    pub users: ResultCache<CacheKey, Arc<UserStats>>,
    /// Contributor code statistics.
    pub code: ResultCache<CacheKey, Arc<CodeStats>>,
    /// Maintainer sets.
    pub maintainers: Arc<MaintainerCache>,
    /// Maintainer lookups that are running or settled within the grace
    /// period.
    pub maintainer_requests: Arc<MaintainerRequests>,
}

impl StatsCaches {
    /// Creates empty caches with the lifetimes from `settings`.
    #[must_use]
    pub fn new(settings: &StatsSettings) -> Self {
        Self {
            repositories: ResultCache::new(settings.result_ttl),
            users: ResultCache::new(settings.result_ttl),
            code: ResultCache::new(settings.result_ttl),
            maintainers: Arc::new(MaintainerCache::new(settings.maintainer_ttl)),
            maintainer_requests: Arc::new(MaintainerRequests::new(settings.coalesce_grace)),
        }
    }

    /// Drops every cached result and maintainer set.
    pub fn clear(&self) {
        self.repositories.clear();
        self.users.clear();
        self.code.clear();
        self.maintainers.clear();
    }
}

/// Pull request and collaborator statistics over a [`GitHubGateway`].
pub struct StatsService<G> {
    gateway: Arc<G>,
    caches: Arc<StatsCaches>,
    maintainers: MaintainerResolver<G>,
    settings: StatsSettings,
    progress: Arc<dyn ProgressSink>,
}

impl<G> StatsService<G>
where
    G: GitHubGateway + 'static,
{
    /// Creates a service with fresh caches and no progress reporting.
    #[must_use]
    pub fn new(gateway: G, settings: StatsSettings) -> Self {
        let caches = Arc::new(StatsCaches::new(&settings));
        Self::with_caches(Arc::new(gateway), caches, settings)
    }

    /// Creates a service over existing caches.
    ///
    /// The grace period of `caches` applies to maintainer lookups;
    /// `settings.coalesce_grace` is only read by [`StatsCaches::new`].
    #[must_use]
    pub fn with_caches(gateway: Arc<G>, caches: Arc<StatsCaches>, settings: StatsSettings) -> Self {
        let maintainers = MaintainerResolver::new(
            Arc::clone(&gateway),
            Arc::clone(&caches.maintainers),
            Arc::clone(&caches.maintainer_requests),
        );
        Self {
            gateway,
            caches,
            maintainers,
            settings,
            progress: Arc::new(NoopProgressSink),
        }
    }

    /// Replaces the progress sink.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Caches used by this service.
    #[must_use]
    pub const fn caches(&self) -> &Arc<StatsCaches> {
        &self.caches
    }

    /// Settings in effect.
    #[must_use]
    pub const fn settings(&self) -> &StatsSettings {
        &self.settings
    }

    fn report(&self, phase: FetchPhase) {
        self.progress.report(phase);
    }

    fn settle<T>(&self, result: Result<T, StatsError>) -> Result<T, StatsError> {
        match &result {
            Ok(_) => self.report(FetchPhase::Done),
            Err(error) => self.report(FetchPhase::Failed {
                reason: error.to_string(),
            }),
        }
        result
    }

    fn cached<V: Clone>(&self, cache: &ResultCache<CacheKey, V>, key: &CacheKey) -> Option<V> {
        self.report(FetchPhase::CacheCheck {
            key: key.to_string(),
        });
        let hit = cache.get(key)?;
        tracing::debug!(%key, "result cache hit");
        self.report(FetchPhase::CacheHit {
            key: key.to_string(),
        });
        self.report(FetchPhase::Done);
        Some(hit)
    }

    fn store<V: Clone>(&self, cache: &ResultCache<CacheKey, V>, key: CacheKey, value: V) {
        self.report(FetchPhase::Caching {
            key: key.to_string(),
        });
        cache.set(key, value);
    }

    /// Pull request statistics for one repository within `filter`.
    ///
    /// `reference` may be `owner/repo`, `github.com/owner/repo` or a GitHub
    /// URL. Repeated calls within the result lifetime are served from the
    /// cache without touching GitHub.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::InvalidReference` for unparseable input, or the
    /// gateway's error when the first page of pull requests cannot be
    /// fetched. Maintainer lookup failures never fail the call.
    pub async fn fetch_repository_stats(
        &self,
        reference: &str,
        filter: TimeFilter,
    ) -> Result<Arc<RepoStats>, StatsError> {
        self.report(FetchPhase::Parsing {
            input: reference.to_owned(),
        });
        let locator = match RepositoryLocator::parse(reference) {
            Ok(locator) => locator,
            Err(error) => return self.settle(Err(error)),
        };

        let key = CacheKey::Repository {
            repository: locator.clone(),
            filter,
        };
        if let Some(hit) = self.cached(&self.caches.repositories, &key) {
            return Ok(hit);
        }

        let result = self.compute_repository_stats(&locator, filter).await;
        if let Ok(stats) = &result {
            self.store(&self.caches.repositories, key, Arc::clone(stats));
        }
        self.settle(result)
    }

    async fn compute_repository_stats(
        &self,
        locator: &RepositoryLocator,
        filter: TimeFilter,
    ) -> Result<Arc<RepoStats>, StatsError> {
        self.report(FetchPhase::ResolvingMaintainers {
            repository: locator.full_name(),
        });
        let maintainers = self.maintainers.resolve(locator).await;

        let gateway = &self.gateway;
        let records = collect_windowed(
            self.settings.repository_pages,
            filter.window_start(Utc::now()),
            self.progress.as_ref(),
            |page| gateway.list_pull_requests(locator, page),
        )
        .await?;

        self.report(FetchPhase::Aggregating {
            records: records.len(),
        });
        let stats = aggregate_repository(&locator.full_name(), records, &maintainers);
        tracing::info!(
            repository = %locator,
            %filter,
            total = stats.total_prs,
            contributors = stats.contributors.len(),
            "computed repository statistics"
        );
        Ok(Arc::new(stats))
    }

    /// Pull request statistics for one author across all repositories
    /// within `filter`.
    ///
    /// `reference` may be a login, `@login`, or a GitHub profile URL. Every
    /// returned pull request is attributed to the profile's canonical login
    /// and avatar.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::InvalidReference` for unparseable input, or the
    /// gateway's error when the profile or the first search page cannot be
    /// fetched.
    pub async fn fetch_user_stats(
        &self,
        reference: &str,
        filter: TimeFilter,
    ) -> Result<Arc<UserStats>, StatsError> {
        self.report(FetchPhase::Parsing {
            input: reference.to_owned(),
        });
        let username = match Username::parse(reference) {
            Ok(username) => username,
            Err(error) => return self.settle(Err(error)),
        };

        let key = CacheKey::User {
            username: username.clone(),
            filter,
        };
        if let Some(hit) = self.cached(&self.caches.users, &key) {
            return Ok(hit);
        }

        let result = self.compute_user_stats(&username, filter).await;
        if let Ok(stats) = &result {
            self.store(&self.caches.users, key, Arc::clone(stats));
        }
        self.settle(result)
    }

    async fn compute_user_stats(
        &self,
        username: &Username,
        filter: TimeFilter,
    ) -> Result<Arc<UserStats>, StatsError> {
        self.report(FetchPhase::FetchingProfile {
            username: username.to_string(),
        });
        let profile = self.gateway.user_profile(username).await?;

        let gateway = &self.gateway;
        let mut records = collect_windowed(
            self.settings.search_pages,
            filter.window_start(Utc::now()),
            self.progress.as_ref(),
            |page| gateway.search_pull_requests(username, page),
        )
        .await?;

        let author = PullRequestAuthor {
            login: profile.login.clone(),
            avatar_url: profile.avatar_url.clone(),
        };
        for record in &mut records {
            record.author = author.clone();
        }

        self.report(FetchPhase::Aggregating {
            records: records.len(),
        });
        let tally = ProfileTally::from_records(&records);
        let busiest = tally.busiest(self.settings.maintainer_check_limit);

        self.report(FetchPhase::CheckingMaintainerStatus {
            repositories: busiest.len(),
        });
        let checks = busiest
            .iter()
            .map(|name| self.maintains(name, &profile.login));
        let is_maintainer = join_all(checks).await.into_iter().any(|maintains| maintains);

        let stats = aggregate_profile(&profile, records, tally, is_maintainer);
        tracing::info!(
            username = %profile.login,
            %filter,
            total = stats.total_stats.total_prs(),
            repositories = stats.repositories.len(),
            is_maintainer,
            "computed user statistics"
        );
        Ok(Arc::new(stats))
    }

    async fn maintains(&self, repository_name: &str, login: &str) -> bool {
        match RepositoryLocator::parse(repository_name) {
            Ok(locator) => self.maintainers.is_maintainer(&locator, login).await,
            Err(error) => {
                tracing::debug!("skipping maintainer check for {repository_name}: {error}");
                false
            }
        }
    }

    /// Per-contributor additions, deletions and commits for a repository.
    ///
    /// GitHub computes these numbers lazily; while it is still doing so the
    /// result has no contributors.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::InvalidReference` for unparseable input, or the
    /// gateway's error when the statistics endpoint fails.
    pub async fn fetch_code_stats(&self, reference: &str) -> Result<Arc<CodeStats>, StatsError> {
        self.report(FetchPhase::Parsing {
            input: reference.to_owned(),
        });
        let locator = match RepositoryLocator::parse(reference) {
            Ok(locator) => locator,
            Err(error) => return self.settle(Err(error)),
        };

        let key = CacheKey::CodeStats {
            repository: locator.clone(),
        };
        if let Some(hit) = self.cached(&self.caches.code, &key) {
            return Ok(hit);
        }

        let result = self
            .gateway
            .contributor_activity(&locator)
            .await
            .map(|activity| {
                self.report(FetchPhase::Aggregating {
                    records: activity.len(),
                });
                Arc::new(aggregate_code(&locator.full_name(), activity))
            });

        // An empty answer usually means GitHub is still computing; do not
        // pin it in the cache.
        if let Ok(stats) = &result
            && !stats.contributors.is_empty()
        {
            self.store(&self.caches.code, key, Arc::clone(stats));
        }
        self.settle(result)
    }
}

impl<G> std::fmt::Debug for StatsService<G> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("StatsService")
            .field("settings", &self.settings)
            .field("caches", &self.caches)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
