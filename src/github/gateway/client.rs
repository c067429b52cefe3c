//! Octocrab client construction helpers for gateway implementations.

use http::Uri;
use octocrab::Octocrab;

use crate::github::error::StatsError;
use crate::github::locator::PersonalAccessToken;

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client for the given API base URL.
///
/// Without a token the client talks to GitHub anonymously and is subject
/// to the much smaller unauthenticated rate limit.
///
/// # Errors
///
/// Returns `StatsError::Configuration` when the base URI cannot be parsed
/// or `StatsError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: Option<&PersonalAccessToken>,
    api_base: &str,
) -> Result<Octocrab, StatsError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| StatsError::Configuration {
            message: format!("invalid GitHub API base `{api_base}`: {error}"),
        })?;

    let builder = match token {
        Some(pat) => Octocrab::builder().personal_token(pat.value()),
        None => Octocrab::builder(),
    };

    builder
        .base_uri(base_uri)
        .map_err(|error| StatsError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
