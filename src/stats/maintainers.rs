//! Resolving which logins maintain a repository.
//!
//! A maintainer is a collaborator with push or admin rights. Listing
//! collaborators needs elevated access that anonymous and low-scope tokens
//! lack, so a failed lookup is logged and treated as "no maintainers"
//! rather than failing the statistics that asked for it. Failed lookups are
//! not cached.

use std::sync::Arc;

use crate::github::{GitHubGateway, RepositoryLocator};

use super::aggregate::MaintainerSet;
use super::cache::{CacheKey, ResultCache};
use super::coalescer::RequestCoalescer;

/// Cache of resolved maintainer sets, shared between resolvers.
pub type MaintainerCache = ResultCache<CacheKey, Arc<MaintainerSet>>;

/// In-flight maintainer lookups, shared between resolvers.
pub type MaintainerRequests = RequestCoalescer<CacheKey, Arc<MaintainerSet>>;

/// Cached and coalesced maintainer lookups.
pub struct MaintainerResolver<G> {
    gateway: Arc<G>,
    cache: Arc<MaintainerCache>,
    requests: Arc<MaintainerRequests>,
}

impl<G> MaintainerResolver<G>
where
    G: GitHubGateway + 'static,
{
    /// Creates a resolver that stores results in `cache` and joins lookups
    /// already registered in `requests`.
    ///
    /// Resolvers built over the same `requests` never list the same
    /// repository's collaborators twice at once.
    #[must_use]
    pub const fn new(
        gateway: Arc<G>,
        cache: Arc<MaintainerCache>,
        requests: Arc<MaintainerRequests>,
    ) -> Self {
        Self {
            gateway,
            cache,
            requests,
        }
    }

    /// Returns the logins with push or admin rights on `locator`.
    ///
    /// Never fails: when GitHub refuses the collaborator listing the result
    /// is an empty set.
    pub async fn resolve(&self, locator: &RepositoryLocator) -> Arc<MaintainerSet> {
        let key = CacheKey::Maintainers {
            repository: locator.clone(),
        };
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(repository = %locator, "maintainer cache hit");
            return cached;
        }

        let gateway = Arc::clone(&self.gateway);
        let cache = Arc::clone(&self.cache);
        let repository = locator.clone();
        let cache_key = key.clone();
        self.requests
            .acquire(key, move || async move {
                match gateway.list_collaborators(&repository).await {
                    Ok(collaborators) => {
                        let maintainers: MaintainerSet = collaborators
                            .into_iter()
                            .filter(|collaborator| collaborator.is_maintainer())
                            .map(|collaborator| collaborator.login)
                            .collect();
                        tracing::debug!(
                            repository = %repository,
                            count = maintainers.len(),
                            "resolved maintainers"
                        );
                        let shared = Arc::new(maintainers);
                        cache.set(cache_key, Arc::clone(&shared));
                        shared
                    }
                    Err(error) => {
                        tracing::warn!(
                            repository = %repository,
                            "could not list collaborators, assuming no maintainers: {error}"
                        );
                        Arc::new(MaintainerSet::new())
                    }
                }
            })
            .await
    }

    /// Returns true when `login` maintains `locator`.
    pub async fn is_maintainer(&self, locator: &RepositoryLocator, login: &str) -> bool {
        self.resolve(locator).await.contains(login)
    }
}

impl<G> std::fmt::Debug for MaintainerResolver<G> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("MaintainerResolver")
            .field("cache", &self.cache)
            .field("requests", &self.requests)
            .finish_non_exhaustive()
    }
}
