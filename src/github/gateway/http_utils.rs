//! Shared HTTP utilities for gateway implementations.

pub(super) fn extract_github_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}

/// Builds the `q` parameter for an issue search restricted to pull requests
/// authored by `login`.
pub(super) fn author_pull_request_query(login: &str) -> String {
    format!("author:{login} is:pr")
}
