//! Shared helpers for integration tests that drive `StatsService` against a
//! mock GitHub API.

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use prstats::{OctocrabGateway, PersonalAccessToken, StatsService, StatsSettings};
use serde_json::{Value, json};
use wiremock::MockServer;

/// Settings with a short coalescing grace so tests never wait long.
pub fn test_settings() -> StatsSettings {
    StatsSettings {
        coalesce_grace: Duration::from_millis(50),
        ..StatsSettings::default()
    }
}

/// Builds a service talking to `server` with a dummy token.
pub fn service_for(server: &MockServer) -> StatsService<OctocrabGateway> {
    let token = PersonalAccessToken::new("test-token").expect("token should be valid");
    let gateway =
        OctocrabGateway::for_token(Some(&token), &server.uri()).expect("gateway should build");
    StatsService::new(gateway, test_settings())
}

/// RFC 3339 timestamp `days` days in the past.
pub fn days_ago(days: i64) -> String {
    (Utc::now() - ChronoDuration::days(days)).to_rfc3339()
}

/// A collaborator entry with the given permissions.
pub fn collaborator(login: &str, push: bool, admin: bool) -> Value {
    json!({ "login": login, "permissions": { "push": push, "admin": admin, "pull": true } })
}
