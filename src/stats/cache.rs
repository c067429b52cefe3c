//! In-memory result cache with per-entry time-to-live.
//!
//! Entries expire lazily: nothing sweeps the map in the background, an
//! expired entry is simply dropped the next time it is read. Timestamps use
//! [`tokio::time::Instant`] so paused-clock tests can advance time.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::github::{RepositoryLocator, TimeFilter, Username};

/// Default lifetime of aggregated statistics.
pub const DEFAULT_RESULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default lifetime of resolved maintainer sets.
pub const DEFAULT_MAINTAINER_TTL: Duration = Duration::from_secs(60 * 60);

/// Identity of a cached or in-flight computation.
///
/// Keys are structured rather than concatenated strings, so no two distinct
/// requests can ever collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Repository-mode statistics for one time window.
    Repository {
        /// Repository being summarised.
        repository: RepositoryLocator,
        /// Time window applied.
        filter: TimeFilter,
    },
    /// Profile-mode statistics for one time window.
    User {
        /// Author being summarised.
        username: Username,
        /// Time window applied.
        filter: TimeFilter,
    },
    /// Contributor code statistics for a repository.
    CodeStats {
        /// Repository being summarised.
        repository: RepositoryLocator,
    },
    /// Maintainer set of a repository.
    Maintainers {
        /// Repository whose collaborators were listed.
        repository: RepositoryLocator,
    },
}

impl fmt::Display for CacheKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repository { repository, filter } => {
                write!(formatter, "repo:{repository}:{filter}")
            }
            Self::User { username, filter } => write!(formatter, "user:{username}:{filter}"),
            Self::CodeStats { repository } => write!(formatter, "code:{repository}"),
            Self::Maintainers { repository } => write!(formatter, "maintainers:{repository}"),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    data: V,
    stored_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) > self.ttl
    }
}

/// A keyed store of values that expire after a time-to-live.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use prstats::stats::ResultCache;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let cache = ResultCache::new(Duration::from_secs(60));
/// cache.set("answer", 42);
/// assert_eq!(cache.get(&"answer"), Some(42));
/// assert!(!cache.has(&"question"));
/// # }
/// ```
pub struct ResultCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    default_ttl: Duration,
}

impl<K, V> ResultCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Creates an empty cache whose entries live for `default_ttl` unless
    /// stored with an explicit lifetime.
    #[must_use]
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
        }
    }

    /// Lifetime applied by [`ResultCache::set`].
    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `data` under `key` with the default lifetime, replacing any
    /// previous entry.
    pub fn set(&self, key: K, data: V) {
        self.set_with_ttl(key, data, self.default_ttl);
    }

    /// Stores `data` under `key` with an explicit lifetime.
    pub fn set_with_ttl(&self, key: K, data: V, ttl: Duration) {
        let entry = CacheEntry {
            data,
            stored_at: Instant::now(),
            ttl,
        };
        self.lock().insert(key, entry);
    }

    /// Returns the value stored under `key` if it has not expired.
    ///
    /// An expired entry is removed as a side effect.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.data.clone()),
            None => None,
        }
    }

    /// Returns true when a live entry exists for `key`.
    pub fn has(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, including expired ones not yet evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<K, V> fmt::Debug for ResultCache<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ResultCache")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}
