//! GitHub quota state attached to rate limit failures.
//!
//! Anonymous callers get 60 core requests an hour and the search API has its
//! own smaller quota, so running out is the usual way a statistics fetch
//! ends early. The gateway reads `GET /rate_limit` after the failure and
//! turns it into a retry hint for the user.

use chrono::{DateTime, Utc};

/// Quota reported by GitHub when a request was refused.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use prstats::github::RateLimitInfo;
///
/// let info = RateLimitInfo::new(60, 0, 1_700_000_600);
/// let now = Utc.timestamp_opt(1_700_000_000, 0).single().expect("valid time");
/// assert_eq!(
///     info.retry_hint(now),
///     "quota of 60 requests used up, retry in 600 s"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    limit: u32,
    remaining: u32,
    resets_at: DateTime<Utc>,
}

impl RateLimitInfo {
    /// Builds the quota from GitHub's `limit`, `remaining` and `reset`
    /// (Unix seconds) fields.
    ///
    /// A reset time chrono cannot represent is treated as already passed.
    #[must_use]
    pub fn new(limit: u32, remaining: u32, reset_epoch_seconds: u64) -> Self {
        let resets_at = i64::try_from(reset_epoch_seconds)
            .ok()
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
            .unwrap_or(DateTime::UNIX_EPOCH);
        Self {
            limit,
            remaining,
            resets_at,
        }
    }

    /// Requests allowed per window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Requests left in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// When the window resets.
    #[must_use]
    pub const fn resets_at(&self) -> DateTime<Utc> {
        self.resets_at
    }

    /// True when the core quota is spent. A refusal while requests remain
    /// means a secondary or search limit was hit instead.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Whole seconds from `now` until the reset, zero once it has passed.
    #[must_use]
    pub fn seconds_until_reset(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from((self.resets_at - now).num_seconds()).unwrap_or(0)
    }

    /// Short human-readable advice on when to try again.
    #[must_use]
    pub fn retry_hint(&self, now: DateTime<Utc>) -> String {
        let wait = match self.seconds_until_reset(now) {
            0 => "retry now".to_owned(),
            seconds => format!("retry in {seconds} s"),
        };
        if self.is_exhausted() {
            format!("quota of {} requests used up, {wait}", self.limit)
        } else {
            format!("{} of {} requests left, {wait}", self.remaining, self.limit)
        }
    }
}
