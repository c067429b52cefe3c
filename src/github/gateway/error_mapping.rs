//! Error mapping helpers for the Octocrab GitHub gateway.

use http::StatusCode;

use crate::github::error::StatsError;

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

fn message_indicates_rate_limit(message: &str, documentation_url: Option<&str>) -> bool {
    message.to_lowercase().contains("rate limit")
        || documentation_url.is_some_and(|url| url.contains("rate-limit"))
}

/// Checks whether the GitHub error represents a rate limit error based on the
/// HTTP status and message / documentation URL content.
pub(super) fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let is_rate_limit_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    is_rate_limit_status
        && message_indicates_rate_limit(&source.message, source.documentation_url.as_deref())
}

fn map_status(operation: &str, status: StatusCode, message: &str) -> StatsError {
    if status == StatusCode::NOT_FOUND {
        return StatsError::NotFound {
            resource: operation.to_owned(),
        };
    }

    if is_auth_failure(status) {
        return StatsError::Authentication {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        };
    }

    StatsError::Api {
        message: format!("{operation} failed with status {status}: {message}"),
    }
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> StatsError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return map_status(operation, source.status_code, &source.message);
    }

    if is_network_error(error) {
        return StatsError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    StatsError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> StatsError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    if matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
        && message_indicates_rate_limit(&message, None)
    {
        return StatsError::RateLimitExceeded {
            rate_limit: None,
            message: format!("{operation} failed: {message}"),
        };
    }
    map_status(operation, status, &message)
}
