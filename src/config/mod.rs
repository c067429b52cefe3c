//! Application configuration loaded from CLI, environment, and files.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.prstats.toml` in the current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PRSTATS_REPO`, `PRSTATS_TOKEN`, or the
//!    conventional `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--repo`/`-r`, `--user`/`-u` and so on
//!
//! # Configuration File
//!
//! ```toml
//! repo = "acme/widgets"
//! time_filter = "3m"
//! token = "ghp_example"
//! result_cache_ttl_seconds = 600
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::error::StatsError;
use crate::github::pagination::{
    DEFAULT_REPOSITORY_PAGE_CAP, DEFAULT_SEARCH_PAGE_CAP, MAX_PER_PAGE,
};
use crate::github::{DEFAULT_API_BASE, PaginationPolicy, PersonalAccessToken, TimeFilter};
use crate::stats::StatsSettings;
use crate::stats::cache::{DEFAULT_MAINTAINER_TTL, DEFAULT_RESULT_TTL};
use crate::stats::service::DEFAULT_MAINTAINER_CHECK_LIMIT;

const DEFAULT_COALESCE_GRACE_MILLIS: u64 = 5_000;

/// What the command line asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Statistics for one repository.
    RepositoryStats,
    /// Statistics for one GitHub account.
    UserStats,
    /// Neither a repository nor a user was given.
    Missing,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use prstats::PrStatsConfig;
///
/// let config = PrStatsConfig::load().expect("failed to load configuration");
/// let settings = config.stats_settings().expect("settings should be valid");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PRSTATS",
    discovery(
        dotfile_name = ".prstats.toml",
        config_file_name = "prstats.toml",
        app_name = "prstats"
    )
)]
pub struct PrStatsConfig {
    /// Repository to summarise, as `owner/repo` or a GitHub URL.
    ///
    /// Can be provided via:
    /// - CLI: `--repo <REPO>` or `-r <REPO>`
    /// - Environment: `PRSTATS_REPO`
    /// - Config file: `repo = "..."`
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// GitHub account to summarise, as `name`, `@name` or a profile URL.
    ///
    /// Ignored when `repo` is also set.
    #[ortho_config(cli_short = 'u')]
    pub user: Option<String>,

    /// Time window: `2w`, `1m`, `3m`, `6m` or `all`. Defaults to `1m`.
    #[ortho_config(cli_short = 'f')]
    pub time_filter: Option<String>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `PRSTATS_TOKEN` or `GITHUB_TOKEN`
    /// - Config file: `token = "..."`
    ///
    /// Without a token requests are anonymous and collaborator listings
    /// usually fail, so nobody is reported as a maintainer.
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API.
    #[ortho_config()]
    pub api_base: Option<String>,

    /// Lifetime of cached statistics, in seconds.
    #[ortho_config()]
    pub result_cache_ttl_seconds: u64,

    /// Lifetime of cached maintainer sets, in seconds.
    #[ortho_config()]
    pub maintainer_cache_ttl_seconds: u64,

    /// How long a settled maintainer lookup stays joinable, in milliseconds.
    #[ortho_config(cli_short = 'C')]
    pub coalesce_grace_millis: u64,

    /// Records requested per page (1-100).
    #[ortho_config()]
    pub page_size: u8,

    /// Maximum pages read from a repository's pull request listing.
    #[ortho_config()]
    pub repository_page_cap: u32,

    /// Maximum pages read from the author search.
    #[ortho_config()]
    pub search_page_cap: u32,

    /// How many of a user's busiest repositories are checked for maintainer
    /// rights.
    #[ortho_config()]
    pub maintainer_check_limit: usize,

    /// Also fetch per-contributor code statistics in repository mode.
    ///
    /// Note: `PRSTATS_CODE_STATS` is not supported because `ortho_config`
    /// does not load boolean values from the environment.
    #[ortho_config(cli_short = 'c')]
    pub code_stats: bool,

    /// Print JSON instead of a text summary.
    #[ortho_config(cli_short = 'j')]
    pub json: bool,
}

impl Default for PrStatsConfig {
    fn default() -> Self {
        Self {
            repo: None,
            user: None,
            time_filter: None,
            token: None,
            api_base: None,
            result_cache_ttl_seconds: DEFAULT_RESULT_TTL.as_secs(),
            maintainer_cache_ttl_seconds: DEFAULT_MAINTAINER_TTL.as_secs(),
            coalesce_grace_millis: DEFAULT_COALESCE_GRACE_MILLIS,
            page_size: MAX_PER_PAGE,
            repository_page_cap: DEFAULT_REPOSITORY_PAGE_CAP,
            search_page_cap: DEFAULT_SEARCH_PAGE_CAP,
            maintainer_check_limit: DEFAULT_MAINTAINER_CHECK_LIMIT,
            code_stats: false,
            json: false,
        }
    }
}

impl PrStatsConfig {
    /// Determines the operation mode. A repository takes priority over a
    /// user.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.repo.is_some() {
            OperationMode::RepositoryStats
        } else if self.user.is_some() {
            OperationMode::UserStats
        } else {
            OperationMode::Missing
        }
    }

    /// Parses the configured time window, defaulting to one month.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Configuration`] for an unknown short code.
    pub fn time_filter(&self) -> Result<TimeFilter, StatsError> {
        self.time_filter
            .as_deref()
            .map_or(Ok(TimeFilter::default()), str::parse)
    }

    /// Resolves the token from configuration or the `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// Blank values are skipped. `None` means requests are made
    /// anonymously.
    #[must_use]
    pub fn resolve_token(&self) -> Option<PersonalAccessToken> {
        self.token
            .as_deref()
            .and_then(|value| PersonalAccessToken::new(value).ok())
            .or_else(|| {
                env::var("GITHUB_TOKEN")
                    .ok()
                    .and_then(|value| PersonalAccessToken::new(value).ok())
            })
    }

    /// Base URL of the GitHub REST API.
    #[must_use]
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    /// Converts the numeric fields into [`StatsSettings`].
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidPagination`] when the page size is
    /// outside 1-100 or a page cap is zero, and
    /// [`StatsError::Configuration`] when the maintainer check limit is zero.
    pub fn stats_settings(&self) -> Result<StatsSettings, StatsError> {
        if self.maintainer_check_limit == 0 {
            return Err(StatsError::Configuration {
                message: "maintainer_check_limit must be at least 1".to_owned(),
            });
        }

        Ok(StatsSettings {
            result_ttl: Duration::from_secs(self.result_cache_ttl_seconds),
            maintainer_ttl: Duration::from_secs(self.maintainer_cache_ttl_seconds),
            coalesce_grace: Duration::from_millis(self.coalesce_grace_millis),
            repository_pages: PaginationPolicy::new(self.page_size, self.repository_page_cap)?,
            search_pages: PaginationPolicy::new(self.page_size, self.search_page_cap)?,
            maintainer_check_limit: self.maintainer_check_limit,
        })
    }
}

#[cfg(test)]
mod tests;
