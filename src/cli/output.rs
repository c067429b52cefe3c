//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use prstats::github::PullRequestOutcome;
use prstats::{CodeStats, PullRequestCounts, RepoStats, StatsError, TimeFilter, UserStats};
use serde::Serialize;

/// Pull requests listed under "Recent pull requests".
const RECENT_LIMIT: usize = 10;

/// Writes any serialisable value as pretty JSON followed by a newline.
pub fn write_json_to<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
) -> Result<(), StatsError> {
    serde_json::to_writer_pretty(&mut *writer, value).map_err(|error| StatsError::Io {
        message: error.to_string(),
    })?;
    writeln!(writer).map_err(|e| io_error(&e))
}

/// Writes a text summary of repository statistics.
pub fn write_repository_summary<W: Write>(
    writer: &mut W,
    stats: &RepoStats,
    filter: TimeFilter,
) -> Result<(), StatsError> {
    writeln!(
        writer,
        "Pull requests for {} ({filter}): {}",
        stats.repository, stats.total_prs
    )
    .map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    for contributor in &stats.contributors {
        let badge = if contributor.is_maintainer {
            " [maintainer]"
        } else {
            ""
        };
        writeln!(
            writer,
            "  @{}{badge}: {}",
            contributor.username,
            counts_line(&contributor.counts)
        )
        .map_err(|e| io_error(&e))?;
    }

    if stats.recent_prs.is_empty() {
        return Ok(());
    }

    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "Recent pull requests:").map_err(|e| io_error(&e))?;
    for record in stats.recent_prs.iter().take(RECENT_LIMIT) {
        writeln!(
            writer,
            "  #{} [{}] {} (@{})",
            record.number,
            outcome_label(record.outcome()),
            record.title,
            record.author.login
        )
        .map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes a text summary of an account's statistics.
pub fn write_user_summary<W: Write>(
    writer: &mut W,
    stats: &UserStats,
    filter: TimeFilter,
) -> Result<(), StatsError> {
    let badge = if stats.is_maintainer {
        " [maintainer]"
    } else {
        ""
    };
    writeln!(writer, "Pull requests by @{}{badge} ({filter})", stats.username)
        .map_err(|e| io_error(&e))?;
    writeln!(writer, "  {}", counts_line(&stats.total_stats)).map_err(|e| io_error(&e))?;

    if stats.repositories.is_empty() {
        return Ok(());
    }

    writeln!(writer).map_err(|e| io_error(&e))?;
    let mut repositories: Vec<_> = stats.repositories.iter().collect();
    repositories.sort_by(|(_, left), (_, right)| right.total_prs().cmp(&left.total_prs()));
    for (name, counts) in repositories {
        writeln!(writer, "  {name}: {}", counts_line(counts)).map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes a text summary of contributor code statistics.
pub fn write_code_summary<W: Write>(writer: &mut W, stats: &CodeStats) -> Result<(), StatsError> {
    writeln!(writer).map_err(|e| io_error(&e))?;
    if stats.contributors.is_empty() {
        writeln!(
            writer,
            "Code statistics for {} are still being computed by GitHub.",
            stats.repository
        )
        .map_err(|e| io_error(&e))?;
        return Ok(());
    }

    writeln!(
        writer,
        "Code statistics for {}: +{} -{}",
        stats.repository, stats.total_additions, stats.total_deletions
    )
    .map_err(|e| io_error(&e))?;
    for contributor in &stats.contributors {
        writeln!(
            writer,
            "  @{}: +{} -{} in {} commits",
            contributor.username, contributor.additions, contributor.deletions, contributor.commits
        )
        .map_err(|e| io_error(&e))?;
    }
    Ok(())
}

fn counts_line(counts: &PullRequestCounts) -> String {
    format!(
        "{} total, {} merged, {} open, {} closed",
        counts.total_prs(), counts.merged_prs(), counts.open_prs(), counts.closed_prs()
    )
}

const fn outcome_label(outcome: PullRequestOutcome) -> &'static str {
    match outcome {
        PullRequestOutcome::Merged => "merged",
        PullRequestOutcome::Open => "open",
        PullRequestOutcome::Closed => "closed",
    }
}

/// Converts an I/O error to a [`StatsError::Io`].
pub(crate) fn io_error(error: &io::Error) -> StatsError {
    StatsError::Io {
        message: error.to_string(),
    }
}
