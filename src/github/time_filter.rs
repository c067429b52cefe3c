//! Time windows applied to pull request creation dates.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::error::StatsError;

/// Caller-selected lower bound on pull request creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeFilter {
    /// The last 14 days.
    #[serde(rename = "2w")]
    TwoWeeks,
    /// The last 30 days.
    #[default]
    #[serde(rename = "1m")]
    OneMonth,
    /// The last 90 days.
    #[serde(rename = "3m")]
    ThreeMonths,
    /// The last 180 days.
    #[serde(rename = "6m")]
    SixMonths,
    /// No lower bound.
    #[serde(rename = "all")]
    AllTime,
}

impl TimeFilter {
    /// Short code used on the command line and in cache keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TwoWeeks => "2w",
            Self::OneMonth => "1m",
            Self::ThreeMonths => "3m",
            Self::SixMonths => "6m",
            Self::AllTime => "all",
        }
    }

    /// Number of days covered, or `None` for [`TimeFilter::AllTime`].
    #[must_use]
    pub const fn days(self) -> Option<i64> {
        match self {
            Self::TwoWeeks => Some(14),
            Self::OneMonth => Some(30),
            Self::ThreeMonths => Some(90),
            Self::SixMonths => Some(180),
            Self::AllTime => None,
        }
    }

    /// Start of the window relative to `now`.
    ///
    /// Records must be created strictly after this instant to count.
    /// [`TimeFilter::AllTime`] starts at the Unix epoch.
    #[must_use]
    pub fn window_start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.days()
            .map_or(DateTime::<Utc>::UNIX_EPOCH, |days| now - Duration::days(days))
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for TimeFilter {
    type Err = StatsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "2w" => Ok(Self::TwoWeeks),
            "1m" => Ok(Self::OneMonth),
            "3m" => Ok(Self::ThreeMonths),
            "6m" => Ok(Self::SixMonths),
            "all" => Ok(Self::AllTime),
            other => Err(StatsError::Configuration {
                message: format!("unknown time filter `{other}` (expected 2w, 1m, 3m, 6m or all)"),
            }),
        }
    }
}
