//! Tests for cache lifetime loading and precedence.

use ortho_config::OrthoConfig;
use rstest::rstest;
use serde_json::json;

use super::helpers::build_config_from_layers;
use crate::PrStatsConfig;

/// Helper to test `result_cache_ttl_seconds` loading from environment and/or CLI.
fn test_result_cache_ttl_seconds_loading(
    env_ttl: Option<&str>,
    cli_args: &[&str],
    expected_ttl: u64,
    description: &str,
) {
    let temp_dir = tempfile::TempDir::new().expect("temp dir should be created");
    let home = temp_dir.path().to_string_lossy().to_string();

    let _guard = env_lock::lock_env([
        ("PRSTATS_RESULT_CACHE_TTL_SECONDS", env_ttl),
        ("HOME", Some(home.as_str())),
        ("XDG_CONFIG_HOME", Some(home.as_str())),
    ]);

    let mut args: Vec<std::ffi::OsString> = vec![std::ffi::OsString::from("prstats")];
    args.extend(cli_args.iter().map(std::ffi::OsString::from));

    let config = PrStatsConfig::load_from_iter(args).expect("config should load");

    assert_eq!(config.result_cache_ttl_seconds, expected_ttl, "{description}");
}

#[rstest]
fn cache_lifetimes_default_to_five_minutes_and_one_hour() {
    let config = PrStatsConfig::default();
    assert_eq!(config.result_cache_ttl_seconds, 300);
    assert_eq!(config.maintainer_cache_ttl_seconds, 3_600);
}

#[rstest]
fn result_cache_ttl_seconds_loads_from_environment_variable() {
    test_result_cache_ttl_seconds_loading(
        Some("900"),
        &[],
        900,
        "expected PRSTATS_RESULT_CACHE_TTL_SECONDS to set TTL",
    );
}

#[rstest]
fn result_cache_ttl_seconds_loads_from_cli_flag() {
    test_result_cache_ttl_seconds_loading(
        None,
        &["--result-cache-ttl-seconds", "42"],
        42,
        "expected --result-cache-ttl-seconds to set TTL",
    );
}

#[rstest]
fn result_cache_ttl_seconds_cli_overrides_environment() {
    test_result_cache_ttl_seconds_loading(
        Some("900"),
        &["--result-cache-ttl-seconds", "42"],
        42,
        "CLI should override environment for result_cache_ttl_seconds",
    );
}

#[rstest]
#[case::file_overrides_defaults(
    vec![
        ("defaults", json!({"maintainer_cache_ttl_seconds": 10})),
        ("file", json!({"maintainer_cache_ttl_seconds": 20}))
    ],
    20
)]
#[case::environment_overrides_file(
    vec![
        ("file", json!({"maintainer_cache_ttl_seconds": 10})),
        ("environment", json!({"maintainer_cache_ttl_seconds": 20}))
    ],
    20
)]
#[case::cli_overrides_environment(
    vec![
        ("environment", json!({"maintainer_cache_ttl_seconds": 10})),
        ("cli", json!({"maintainer_cache_ttl_seconds": 20}))
    ],
    20
)]
fn maintainer_cache_ttl_seconds_layer_precedence(
    #[case] layers: Vec<(&str, serde_json::Value)>,
    #[case] expected: u64,
) {
    let config = build_config_from_layers(&layers);
    assert_eq!(
        config.maintainer_cache_ttl_seconds, expected,
        "maintainer_cache_ttl_seconds should follow standard precedence rules"
    );
}
