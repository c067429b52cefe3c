//! Walking newest-first pull request pages until the time window is left.
//!
//! GitHub returns pages sorted by creation date, newest first. Once a page
//! contains a record created at or before the window start, every later
//! page is older still, so the walk stops there. The walk also stops on an
//! empty page or at the policy's page cap.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::github::{PageRequest, PaginationPolicy, PullRequestRecord, StatsError};
use crate::progress::{FetchPhase, ProgressSink};

/// Collects the in-window records reachable within `policy`.
///
/// A failure on the first page is returned unchanged. A GitHub failure on a
/// later page ends the walk and the records gathered so far are returned.
///
/// # Errors
///
/// Returns whatever `fetch_page` returns for page one.
pub async fn collect_windowed<F, Fut>(
    policy: PaginationPolicy,
    window_start: DateTime<Utc>,
    progress: &dyn ProgressSink,
    mut fetch_page: F,
) -> Result<Vec<PullRequestRecord>, StatsError>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Vec<PullRequestRecord>, StatsError>>,
{
    let mut collected = Vec::new();

    for request in policy.pages() {
        let page = match fetch_page(request).await {
            Ok(page) => page,
            Err(error) if !request.is_first_page() && error.is_transport_failure() => {
                tracing::warn!(
                    page = request.page(),
                    kept = collected.len(),
                    "stopping pagination after failure: {error}"
                );
                break;
            }
            Err(error) => return Err(error),
        };

        if page.is_empty() {
            break;
        }

        let fetched = page.len();
        let before = collected.len();
        collected.extend(
            page.into_iter()
                .filter(|record| record.created_after(window_start)),
        );
        let in_window = collected.len() - before;

        progress.report(FetchPhase::PageFetched {
            page: request.page(),
            in_window,
        });

        if in_window < fetched {
            tracing::debug!(page = request.page(), "reached the end of the time window");
            break;
        }
    }

    Ok(collected)
}
