//! Tests for [`StatsService`] orchestration over a mocked gateway.

use std::sync::Arc;

use chrono::{Duration, Utc};
use mockall::predicate::always;
use rstest::{fixture, rstest};

use super::{StatsCaches, StatsService, StatsSettings};
use crate::github::{
    Collaborator, ContributorActivity, MockGitHubGateway, PageRequest, PullRequestAuthor,
    PullRequestRecord, PullRequestState, RepositoryLocator, StatsError, TimeFilter, UserProfile,
};
use crate::github::models::UNKNOWN_REPOSITORY;
use crate::progress::{FetchPhase, RecordingProgressSink};
use crate::stats::PullRequestCounts;

fn record(
    number: u64,
    login: &str,
    repository: &str,
    state: PullRequestState,
    merged: bool,
) -> PullRequestRecord {
    let created_at = Utc::now() - Duration::hours(i64::try_from(number).unwrap_or(0) + 1);
    PullRequestRecord {
        number,
        title: format!("PR {number}"),
        state,
        created_at,
        merged_at: merged.then_some(created_at),
        url: format!("https://github.com/{repository}/pull/{number}"),
        repository_name: repository.to_owned(),
        author: PullRequestAuthor {
            login: login.to_owned(),
            avatar_url: format!("https://avatars.example/{login}"),
        },
    }
}

fn widgets_records() -> Vec<PullRequestRecord> {
    use PullRequestState::{Closed, Open};
    vec![
        record(1, "alice", "acme/widgets", Closed, true),
        record(2, "bob", "acme/widgets", Open, false),
        record(3, "alice", "acme/widgets", Closed, true),
        record(4, "alice", "acme/widgets", Open, false),
        record(5, "bob", "acme/widgets", Closed, false),
        record(6, "alice", "acme/widgets", Closed, true),
    ]
}

fn first_page_only(
    records: Vec<PullRequestRecord>,
) -> impl Fn(PageRequest) -> Result<Vec<PullRequestRecord>, StatsError> + Send + 'static {
    move |page| {
        if page.is_first_page() {
            Ok(records.clone())
        } else {
            Ok(Vec::new())
        }
    }
}

fn admin(login: &str) -> Collaborator {
    Collaborator {
        login: login.to_owned(),
        push: true,
        admin: true,
    }
}

fn service(gateway: MockGitHubGateway) -> StatsService<MockGitHubGateway> {
    StatsService::new(gateway, StatsSettings::default())
}

#[fixture]
fn widgets_gateway() -> MockGitHubGateway {
    let mut gateway = MockGitHubGateway::new();
    gateway
        .expect_list_collaborators()
        .times(1)
        .returning(|_| Ok(vec![admin("alice")]));
    let pages = first_page_only(widgets_records());
    gateway
        .expect_list_pull_requests()
        .with(always(), always())
        .times(2)
        .returning(move |_, page| pages(page));
    gateway
}

#[rstest]
#[tokio::test]
async fn repository_stats_rank_contributors(widgets_gateway: MockGitHubGateway) {
    let service = service(widgets_gateway);

    let stats = service
        .fetch_repository_stats("https://github.com/acme/widgets", TimeFilter::OneMonth)
        .await
        .expect("stats should load");

    assert_eq!(stats.repository, "acme/widgets");
    assert_eq!(stats.total_prs, 6);
    assert_eq!(stats.recent_prs.len(), 6);

    let alice = stats.contributors.first().expect("alice first");
    assert_eq!(alice.username, "alice");
    assert_eq!(
        (
            alice.counts.total_prs(),
            alice.counts.merged_prs(),
            alice.counts.open_prs(),
            alice.counts.closed_prs()
        ),
        (4, 3, 1, 0)
    );
    assert!(alice.is_maintainer);

    let bob = stats.contributors.get(1).expect("bob second");
    assert_eq!(bob.username, "bob");
    assert_eq!(
        (
            bob.counts.total_prs(),
            bob.counts.merged_prs(),
            bob.counts.open_prs(),
            bob.counts.closed_prs()
        ),
        (2, 0, 1, 1)
    );
    assert!(!bob.is_maintainer);
}

fn acme_widgets_records() -> Vec<PullRequestRecord> {
    use PullRequestState::{Closed, Open};
    vec![
        record(1, "alice", "acme/widgets", Closed, true),
        record(2, "alice", "acme/widgets", Closed, true),
        record(3, "bob", "acme/widgets", Closed, false),
        record(4, "alice", "acme/widgets", Open, false),
        record(5, "alice", "acme/widgets", Closed, true),
    ]
}

#[rstest]
#[case::owner_repo("acme/widgets")]
#[case::bare_host("github.com/acme/widgets")]
#[case::clone_url("https://github.com/acme/widgets.git")]
#[tokio::test]
async fn acme_widgets_month_is_summarised(#[case] reference: &str) {
    let mut gateway = MockGitHubGateway::new();
    gateway
        .expect_list_collaborators()
        .times(1)
        .returning(|_| Ok(vec![admin("alice")]));
    let pages = first_page_only(acme_widgets_records());
    gateway
        .expect_list_pull_requests()
        .returning(move |_, page| pages(page));
    let service = service(gateway);

    let stats = service
        .fetch_repository_stats(reference, TimeFilter::OneMonth)
        .await
        .expect("stats should load");

    assert_eq!(stats.repository, "acme/widgets");
    assert_eq!(stats.total_prs, 5);
    let summary: Vec<_> = stats
        .contributors
        .iter()
        .map(|contributor| {
            (
                contributor.username.as_str(),
                contributor.counts.total_prs(),
                contributor.counts.merged_prs(),
                contributor.counts.open_prs(),
                contributor.counts.closed_prs(),
                contributor.is_maintainer,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![("alice", 4, 3, 1, 0, true), ("bob", 1, 0, 0, 1, false)]
    );
}

#[tokio::test]
async fn services_sharing_caches_share_maintainer_lookups() {
    let mut gateway = MockGitHubGateway::new();
    gateway
        .expect_list_collaborators()
        .times(1)
        .returning(|_| Ok(vec![admin("alice")]));
    let pages = first_page_only(widgets_records());
    gateway
        .expect_list_pull_requests()
        .times(4)
        .returning(move |_, page| pages(page));
    let gateway = Arc::new(gateway);
    let settings = StatsSettings::default();
    let caches = Arc::new(StatsCaches::new(&settings));
    let first = StatsService::with_caches(Arc::clone(&gateway), Arc::clone(&caches), settings);
    let second = StatsService::with_caches(gateway, Arc::clone(&caches), settings);

    first
        .fetch_repository_stats("acme/widgets", TimeFilter::OneMonth)
        .await
        .expect("first service should load");
    caches.maintainers.clear();
    let stats = second
        .fetch_repository_stats("acme/widgets", TimeFilter::AllTime)
        .await
        .expect("second service should load");

    let alice = stats.contributors.first().expect("alice first");
    assert!(
        alice.is_maintainer,
        "second service should join the settled lookup"
    );
}

#[rstest]
#[tokio::test]
async fn repeated_requests_are_served_from_cache(widgets_gateway: MockGitHubGateway) {
    let service = service(widgets_gateway);

    let first = service
        .fetch_repository_stats("acme/widgets", TimeFilter::OneMonth)
        .await
        .expect("first call should load");
    let second = service
        .fetch_repository_stats("github.com/acme/widgets", TimeFilter::OneMonth)
        .await
        .expect("second call should hit the cache");

    assert!(Arc::ptr_eq(&first, &second), "expected the cached instance");
}

#[rstest]
#[tokio::test]
async fn cache_hit_reports_short_progress(widgets_gateway: MockGitHubGateway) {
    let sink = Arc::new(RecordingProgressSink::default());
    let service = service(widgets_gateway).with_progress(Arc::clone(&sink) as _);

    service
        .fetch_repository_stats("acme/widgets", TimeFilter::OneMonth)
        .await
        .expect("first call should load");
    let cold = sink.take();
    assert!(matches!(cold.first(), Some(FetchPhase::Parsing { .. })));
    assert!(cold.contains(&FetchPhase::PageFetched {
        page: 1,
        in_window: 6
    }));
    assert_eq!(cold.last(), Some(&FetchPhase::Done));

    service
        .fetch_repository_stats("acme/widgets", TimeFilter::OneMonth)
        .await
        .expect("second call should hit the cache");
    let key = "repo:acme/widgets:1m".to_owned();
    assert_eq!(
        sink.take(),
        vec![
            FetchPhase::Parsing {
                input: "acme/widgets".to_owned()
            },
            FetchPhase::CacheCheck { key: key.clone() },
            FetchPhase::CacheHit { key },
            FetchPhase::Done,
        ]
    );
}

#[tokio::test]
async fn different_windows_are_cached_separately() {
    let mut gateway = MockGitHubGateway::new();
    gateway
        .expect_list_collaborators()
        .times(1)
        .returning(|_| Ok(Vec::new()));
    let pages = first_page_only(widgets_records());
    gateway
        .expect_list_pull_requests()
        .times(4)
        .returning(move |_, page| pages(page));
    let service = service(gateway);

    for filter in [TimeFilter::OneMonth, TimeFilter::AllTime] {
        service
            .fetch_repository_stats("acme/widgets", filter)
            .await
            .expect("stats should load");
    }
}

#[tokio::test]
async fn collaborator_failure_marks_nobody_as_maintainer() {
    let mut gateway = MockGitHubGateway::new();
    gateway.expect_list_collaborators().returning(|_| {
        Err(StatsError::Authentication {
            message: "403 Must have push access".to_owned(),
        })
    });
    let pages = first_page_only(widgets_records());
    gateway
        .expect_list_pull_requests()
        .returning(move |_, page| pages(page));
    let service = service(gateway);

    let stats = service
        .fetch_repository_stats("acme/widgets", TimeFilter::OneMonth)
        .await
        .expect("collaborator failure must not fail the call");

    assert_eq!(stats.total_prs, 6);
    assert!(
        stats.contributors.iter().all(|contributor| !contributor.is_maintainer),
        "nobody should be flagged as maintainer"
    );
}

#[tokio::test]
async fn invalid_reference_fails_without_network() {
    let gateway = MockGitHubGateway::new();
    let sink = Arc::new(RecordingProgressSink::default());
    let service = service(gateway).with_progress(Arc::clone(&sink) as _);

    let error = service
        .fetch_repository_stats("not a repository", TimeFilter::OneMonth)
        .await
        .expect_err("parse should fail");

    assert!(matches!(error, StatsError::InvalidReference { .. }));
    assert!(matches!(
        sink.take().last(),
        Some(FetchPhase::Failed { .. })
    ));
}

#[tokio::test]
async fn first_page_failure_is_surfaced_and_not_cached() {
    let mut gateway = MockGitHubGateway::new();
    gateway
        .expect_list_collaborators()
        .returning(|_| Ok(Vec::new()));
    gateway.expect_list_pull_requests().times(2).returning(|locator, _| {
        Err(StatsError::NotFound {
            resource: locator.full_name(),
        })
    });
    let service = service(gateway);

    for _ in 0..2 {
        let error = service
            .fetch_repository_stats("acme/missing", TimeFilter::OneMonth)
            .await
            .expect_err("listing should fail");
        assert_eq!(
            error,
            StatsError::NotFound {
                resource: "acme/missing".to_owned()
            }
        );
    }
    assert!(service.caches().repositories.is_empty());
}

fn carol_records() -> Vec<PullRequestRecord> {
    use PullRequestState::{Closed, Open};
    let mut records = Vec::new();
    for number in 0..5 {
        records.push(record(number, "someone-else", "x/a", Closed, true));
    }
    for number in 5..8 {
        records.push(record(number, "someone-else", "x/b", Open, false));
    }
    records.push(record(8, "someone-else", "x/c", Closed, false));
    records.push(record(9, "someone-else", "x/c", Closed, true));
    records.push(record(10, "someone-else", "x/d", Open, false));
    records
}

fn carol_profile() -> UserProfile {
    UserProfile {
        login: "carol".to_owned(),
        avatar_url: "https://avatars.example/carol".to_owned(),
    }
}

fn carol_gateway() -> MockGitHubGateway {
    let mut gateway = MockGitHubGateway::new();
    gateway
        .expect_user_profile()
        .times(1)
        .returning(|_| Ok(carol_profile()));
    let pages = first_page_only(carol_records());
    gateway
        .expect_search_pull_requests()
        .times(2)
        .returning(move |_, page| pages(page));
    gateway
}

fn collaborators_of(
    gateway: &mut MockGitHubGateway,
    repository: &'static str,
    result: Result<Vec<Collaborator>, StatsError>,
) {
    gateway
        .expect_list_collaborators()
        .withf(move |locator: &RepositoryLocator| locator.full_name() == repository)
        .times(1)
        .returning(move |_| result.clone());
}

#[tokio::test]
async fn user_stats_check_only_the_busiest_repositories() {
    let mut gateway = carol_gateway();
    collaborators_of(&mut gateway, "x/a", Ok(vec![admin("dave")]));
    collaborators_of(
        &mut gateway,
        "x/b",
        Ok(vec![Collaborator {
            login: "carol".to_owned(),
            push: true,
            admin: false,
        }]),
    );
    collaborators_of(
        &mut gateway,
        "x/c",
        Err(StatsError::Api {
            message: "boom".to_owned(),
        }),
    );
    let service = service(gateway);

    let stats = service
        .fetch_user_stats("@carol", TimeFilter::ThreeMonths)
        .await
        .expect("user stats should load");

    assert!(stats.is_maintainer);
    assert_eq!(stats.username, "carol");
    assert_eq!(stats.repositories.len(), 4);
    assert_eq!(stats.total_stats.total_prs(), 11);
    let x_a = stats.repositories.get("x/a").expect("x/a tallied");
    assert_eq!((x_a.total_prs(), x_a.merged_prs()), (5, 5));
    assert!(
        stats
            .pull_requests
            .iter()
            .all(|pull| pull.author.login == "carol"
                && pull.author.avatar_url == "https://avatars.example/carol"),
        "records should be attributed to the profile"
    );
}

#[tokio::test]
async fn records_without_a_repository_are_never_checked_for_maintainers() {
    use PullRequestState::{Closed, Open};
    let mut gateway = MockGitHubGateway::new();
    gateway
        .expect_user_profile()
        .returning(|_| Ok(carol_profile()));
    let mut records: Vec<_> = (0..4)
        .map(|number| record(number, "carol", UNKNOWN_REPOSITORY, Open, false))
        .collect();
    records.push(record(4, "carol", "x/a", Closed, true));
    let pages = first_page_only(records);
    gateway
        .expect_search_pull_requests()
        .returning(move |_, page| pages(page));
    collaborators_of(&mut gateway, "x/a", Ok(vec![admin("dave")]));
    let service = service(gateway);

    let stats = service
        .fetch_user_stats("carol", TimeFilter::AllTime)
        .await
        .expect("user stats should load");

    assert!(!stats.is_maintainer);
    assert_eq!(
        stats
            .repositories
            .get(UNKNOWN_REPOSITORY)
            .map(PullRequestCounts::total_prs),
        Some(4)
    );
}

#[tokio::test]
async fn user_is_not_maintainer_when_every_check_fails() {
    let mut gateway = carol_gateway();
    gateway
        .expect_list_collaborators()
        .times(3)
        .returning(|_| {
            Err(StatsError::Network {
                message: "timeout".to_owned(),
            })
        });
    let service = service(gateway);

    let stats = service
        .fetch_user_stats("carol", TimeFilter::AllTime)
        .await
        .expect("maintainer failures must not fail the call");

    assert!(!stats.is_maintainer);
}

#[tokio::test]
async fn user_stats_surface_profile_failures() {
    let mut gateway = MockGitHubGateway::new();
    gateway.expect_user_profile().returning(|username| {
        Err(StatsError::NotFound {
            resource: username.to_string(),
        })
    });
    let service = service(gateway);

    let error = service
        .fetch_user_stats("ghost", TimeFilter::OneMonth)
        .await
        .expect_err("missing user should fail");

    assert!(matches!(error, StatsError::NotFound { .. }));
}

fn activity(login: &str, additions: u64, deletions: u64) -> ContributorActivity {
    ContributorActivity {
        author: PullRequestAuthor {
            login: login.to_owned(),
            avatar_url: String::new(),
        },
        additions,
        deletions,
        commits: 3,
    }
}

#[tokio::test]
async fn code_stats_are_ranked_and_cached() {
    let mut gateway = MockGitHubGateway::new();
    gateway
        .expect_contributor_activity()
        .times(1)
        .returning(|_| Ok(vec![activity("bob", 5, 5), activity("alice", 100, 20)]));
    let service = service(gateway);

    let first = service
        .fetch_code_stats("acme/widgets")
        .await
        .expect("code stats should load");
    let second = service
        .fetch_code_stats("acme/widgets")
        .await
        .expect("code stats should be cached");

    let names: Vec<&str> = first
        .contributors
        .iter()
        .map(|contributor| contributor.username.as_str())
        .collect();
    assert_eq!(names, vec!["alice", "bob"]);
    assert_eq!((first.total_additions, first.total_deletions), (105, 25));
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn pending_code_stats_are_not_cached() {
    let mut gateway = MockGitHubGateway::new();
    gateway
        .expect_contributor_activity()
        .times(2)
        .returning(|_| Ok(Vec::new()));
    let service = service(gateway);

    for _ in 0..2 {
        let stats = service
            .fetch_code_stats("acme/widgets")
            .await
            .expect("pending stats should not fail");
        assert!(stats.contributors.is_empty());
    }
}
