//! Error types exposed by the GitHub statistics layer.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Errors surfaced while parsing input, talking to GitHub, or loading
/// configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatsError {
    /// The repository reference or username could not be understood.
    #[error("invalid reference `{input}`: {reason}")]
    InvalidReference {
        /// The raw input as supplied by the caller.
        input: String,
        /// Why the input was rejected.
        reason: String,
    },

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// The reference was well formed but GitHub has no such entity.
    #[error("not found on GitHub: {resource}")]
    NotFound {
        /// The repository or user that could not be found.
        resource: String,
    },

    /// Rate limit exceeded - the API returned 403/429 with a rate limit message.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Rate limit info if it could be fetched after the failure.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Invalid pagination parameters.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the invalid parameter.
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl StatsError {
    /// Builds an [`StatsError::InvalidReference`] for the given input.
    pub(crate) fn invalid_reference(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }

    /// Returns true when the error came from talking to GitHub rather than
    /// from bad input or local configuration.
    ///
    /// Transport failures are the class that maintainer resolution absorbs
    /// and that pagination absorbs after the first page.
    #[must_use]
    pub const fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. }
                | Self::NotFound { .. }
                | Self::RateLimitExceeded { .. }
                | Self::Api { .. }
                | Self::Network { .. }
        )
    }
}
