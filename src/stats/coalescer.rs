//! De-duplication of concurrent identical requests.
//!
//! The first caller for a key starts the work; everyone who asks for the
//! same key while it is running receives a clone of the same shared future
//! and therefore the same outcome, success or failure alike. Once the work
//! settles the entry lingers for a grace period so a burst of late callers
//! still lands on the finished result instead of starting a fresh request.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use futures::future::{self, BoxFuture, Shared};

/// Default time a settled request stays joinable.
pub const DEFAULT_COALESCE_GRACE: Duration = Duration::from_secs(5);

/// Handle to an in-flight request; await it to obtain the outcome.
pub type SharedRequest<V> = Shared<BoxFuture<'static, V>>;

struct InFlight<V: Clone> {
    generation: u64,
    request: SharedRequest<V>,
}

type InFlightMap<K, V> = Arc<Mutex<HashMap<K, InFlight<V>>>>;

fn lock<K, V: Clone>(map: &InFlightMap<K, V>) -> MutexGuard<'_, HashMap<K, InFlight<V>>> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Joins concurrent callers asking for the same key onto one computation.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use prstats::stats::RequestCoalescer;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let coalescer = RequestCoalescer::new(Duration::from_millis(10));
/// let first = coalescer.acquire("key", || async { 7_u32 });
/// let second = coalescer.acquire("key", || async { 0_u32 });
/// assert_eq!((first.await, second.await), (7, 7));
/// # }
/// ```
pub struct RequestCoalescer<K, V: Clone> {
    in_flight: InFlightMap<K, V>,
    grace: Duration,
    next_generation: AtomicU64,
}

impl<K, V> RequestCoalescer<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a coalescer whose settled entries stay joinable for `grace`.
    #[must_use]
    pub fn new(grace: Duration) -> Self {
        Self {
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            grace,
            next_generation: AtomicU64::new(0),
        }
    }

    /// Grace period applied after a request settles.
    #[must_use]
    pub const fn grace(&self) -> Duration {
        self.grace
    }

    /// Returns the shared request registered for `key`, starting it with
    /// `start` when none is registered.
    ///
    /// Registration happens before this function returns, so two callers
    /// that race on the same key can never both invoke `start`. `start` runs
    /// on the first poll, after the registration lock is released, so it may
    /// itself call `acquire` for the same key and receive the registered
    /// request. Must be called from within a Tokio runtime: settling and the
    /// grace delay are driven by a spawned task.
    pub fn acquire<F, Fut>(&self, key: K, start: F) -> SharedRequest<V>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = V> + Send + 'static,
    {
        let mut in_flight = lock(&self.in_flight);
        if let Some(existing) = in_flight.get(&key) {
            tracing::trace!("joining in-flight request");
            return existing.request.clone();
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let request = future::lazy(move |_| start()).flatten().boxed().shared();
        in_flight.insert(
            key.clone(),
            InFlight {
                generation,
                request: request.clone(),
            },
        );
        drop(in_flight);

        self.schedule_release(key, generation, request.clone());
        request
    }

    /// Number of keys currently registered, settled or not.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        lock(&self.in_flight).len()
    }

    fn schedule_release(&self, key: K, generation: u64, request: SharedRequest<V>) {
        let in_flight = Arc::clone(&self.in_flight);
        let grace = self.grace;
        tokio::spawn(async move {
            let _settled = request.await;
            tokio::time::sleep(grace).await;

            let mut entries = lock(&in_flight);
            if entries
                .get(&key)
                .is_some_and(|entry| entry.generation == generation)
            {
                entries.remove(&key);
            }
        });
    }
}

impl<K, V: Clone> fmt::Debug for RequestCoalescer<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RequestCoalescer")
            .field("grace", &self.grace)
            .finish_non_exhaustive()
    }
}
