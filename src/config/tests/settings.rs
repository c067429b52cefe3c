//! Tests for converting configuration into `StatsSettings`.

use std::time::Duration;

use rstest::rstest;

use crate::PrStatsConfig;
use crate::github::StatsError;
use crate::stats::StatsSettings;

#[rstest]
fn defaults_match_library_defaults() {
    let settings = PrStatsConfig::default()
        .stats_settings()
        .expect("defaults should be valid");

    assert_eq!(settings, StatsSettings::default());
}

#[rstest]
fn numeric_fields_are_converted() {
    let config = PrStatsConfig {
        result_cache_ttl_seconds: 60,
        maintainer_cache_ttl_seconds: 120,
        coalesce_grace_millis: 250,
        page_size: 50,
        repository_page_cap: 2,
        search_page_cap: 1,
        maintainer_check_limit: 5,
        ..Default::default()
    };

    let settings = config.stats_settings().expect("settings should be valid");

    assert_eq!(settings.result_ttl, Duration::from_secs(60));
    assert_eq!(settings.maintainer_ttl, Duration::from_secs(120));
    assert_eq!(settings.coalesce_grace, Duration::from_millis(250));
    assert_eq!(settings.repository_pages.per_page(), 50);
    assert_eq!(settings.repository_pages.max_pages(), 2);
    assert_eq!(settings.search_pages.max_pages(), 1);
    assert_eq!(settings.maintainer_check_limit, 5);
}

#[rstest]
#[case::zero_page_size(0, 5)]
#[case::oversized_page(101, 5)]
#[case::zero_cap(100, 0)]
fn invalid_paging_is_rejected(#[case] page_size: u8, #[case] repository_page_cap: u32) {
    let config = PrStatsConfig {
        page_size,
        repository_page_cap,
        ..Default::default()
    };

    assert!(matches!(
        config.stats_settings(),
        Err(StatsError::InvalidPagination { .. })
    ));
}

#[rstest]
fn zero_maintainer_check_limit_is_rejected() {
    let config = PrStatsConfig {
        maintainer_check_limit: 0,
        ..Default::default()
    };

    assert!(matches!(
        config.stats_settings(),
        Err(StatsError::Configuration { .. })
    ));
}
