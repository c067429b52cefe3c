//! Progress events emitted while a statistics fetch runs.
//!
//! Fetches can take several seconds against a cold cache, so the service
//! reports each phase to an injected [`ProgressSink`]. Nothing here is
//! global: every [`StatsService`](crate::stats::StatsService) carries its
//! own sink, and the default sink drops everything.

use std::fmt;
use std::io;

use serde::Serialize;

/// One step of a statistics fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum FetchPhase {
    /// Parsing the caller's repository or username reference.
    Parsing {
        /// Raw reference as supplied.
        input: String,
    },
    /// Looking the request up in the result cache.
    CacheCheck {
        /// Cache key being consulted.
        key: String,
    },
    /// A cached result satisfied the request.
    CacheHit {
        /// Cache key that matched.
        key: String,
    },
    /// Resolving the maintainer set for a repository.
    ResolvingMaintainers {
        /// Repository in `owner/repo` form.
        repository: String,
    },
    /// Fetching the public profile of a user.
    FetchingProfile {
        /// Login being fetched.
        username: String,
    },
    /// A page of pull requests was fetched.
    PageFetched {
        /// 1-based page number.
        page: u32,
        /// Records on the page that fall inside the time window.
        in_window: usize,
    },
    /// Checking maintainer status on the user's busiest repositories.
    CheckingMaintainerStatus {
        /// Number of repositories being checked.
        repositories: usize,
    },
    /// Folding fetched records into statistics.
    Aggregating {
        /// Number of records being aggregated.
        records: usize,
    },
    /// Storing the finished result.
    Caching {
        /// Cache key being written.
        key: String,
    },
    /// The fetch finished successfully.
    Done,
    /// The fetch failed.
    Failed {
        /// Human-readable failure description.
        reason: String,
    },
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parsing { input } => write!(formatter, "Parsing `{input}`"),
            Self::CacheCheck { key } => write!(formatter, "Checking cache for {key}"),
            Self::CacheHit { key } => write!(formatter, "Using cached result for {key}"),
            Self::ResolvingMaintainers { repository } => {
                write!(formatter, "Fetching maintainers of {repository}")
            }
            Self::FetchingProfile { username } => {
                write!(formatter, "Fetching profile of {username}")
            }
            Self::PageFetched { page, in_window } => {
                write!(formatter, "Fetched page {page} ({in_window} in window)")
            }
            Self::CheckingMaintainerStatus { repositories } => write!(
                formatter,
                "Checking maintainer status on {repositories} repositories"
            ),
            Self::Aggregating { records } => {
                write!(formatter, "Aggregating {records} pull requests")
            }
            Self::Caching { key } => write!(formatter, "Caching {key}"),
            Self::Done => formatter.write_str("Done"),
            Self::Failed { reason } => write!(formatter, "Failed: {reason}"),
        }
    }
}

/// A sink that receives progress events.
pub trait ProgressSink: Send + Sync {
    /// Reports one phase of a fetch.
    fn report(&self, phase: FetchPhase);
}

/// Progress sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn report(&self, _phase: FetchPhase) {}
}

/// Forwards progress events to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn report(&self, phase: FetchPhase) {
        tracing::debug!(phase = %phase, "stats progress");
    }
}

/// Writes one human-readable line per event to stderr.
#[derive(Debug, Default)]
pub struct StderrProgressSink;

impl ProgressSink for StderrProgressSink {
    fn report(&self, phase: FetchPhase) {
        let _ignored = writeln_stderr(&phase.to_string());
    }
}

/// Adapts a closure that accepts the rendered progress message.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use prstats::progress::{FetchPhase, FnProgressSink, ProgressSink};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let captured = Arc::clone(&seen);
/// let sink = FnProgressSink::new(move |message: &str| {
///     captured.lock().expect("lock").push(message.to_owned());
/// });
/// sink.report(FetchPhase::Done);
/// assert_eq!(seen.lock().expect("lock").as_slice(), ["Done"]);
/// ```
pub struct FnProgressSink<F> {
    callback: F,
}

impl<F> FnProgressSink<F>
where
    F: Fn(&str) + Send + Sync,
{
    /// Wraps `callback`.
    pub const fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> fmt::Debug for FnProgressSink<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("FnProgressSink").finish_non_exhaustive()
    }
}

impl<F> ProgressSink for FnProgressSink<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, phase: FetchPhase) {
        (self.callback)(&phase.to_string());
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Sink that keeps every event for later assertions.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingProgressSink {
    events: std::sync::Mutex<Vec<FetchPhase>>,
}

#[cfg(test)]
impl RecordingProgressSink {
    pub(crate) fn take(&self) -> Vec<FetchPhase> {
        self.events
            .lock()
            .expect("events mutex should be available")
            .drain(..)
            .collect()
    }
}

#[cfg(test)]
impl ProgressSink for RecordingProgressSink {
    fn report(&self, phase: FetchPhase) {
        self.events
            .lock()
            .expect("events mutex should be available")
            .push(phase);
    }
}
