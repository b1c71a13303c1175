use serde::{Deserialize, Serialize};

use super::{remaining_reviews, remaining_snippets, TranscriptionInfo};
use crate::store::{RevisionId, StoreError, VersionedStore};

/// Completion counts for one action kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressCounts {
    pub total: u64,
    pub completed: u64,
    pub remaining: u64,
    /// Floor-divided percentage, matching the legacy rounding
    /// (`completed * 100 / total`).
    pub percent: u64,
}

/// Snippet and review progress as of one revision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub snippets: ProgressCounts,
    pub reviews: ProgressCounts,
}

/// Number of fixed-length units covering `duration_ms`, i.e. the
/// ceiling of `duration_ms / segment_ms`. Zero when either input is
/// zero.
pub fn snippets_total(duration_ms: u64, segment_ms: u64) -> u64 {
    if segment_ms == 0 {
        return 0;
    }
    let mut total = duration_ms / segment_ms;
    if duration_ms % segment_ms != 0 {
        total += 1;
    }
    total
}

fn counts(total: u64, remaining: u64) -> ProgressCounts {
    if total == 0 {
        return ProgressCounts::default();
    }
    let completed = total.saturating_sub(remaining);
    ProgressCounts {
        total,
        completed,
        remaining,
        percent: completed * 100 / total,
    }
}

/// Compute snippet and review progress at revision `at`.
///
/// Absent or zero duration yields an all-zero report, never a division
/// error.
pub fn progress<S: VersionedStore>(
    store: &S,
    at: &RevisionId,
    segment_ms: u64,
) -> Result<ProgressReport, StoreError> {
    let info = TranscriptionInfo::load(store, at)?;
    let duration = match info.duration {
        Some(d) => d,
        None => return Ok(ProgressReport::default()),
    };
    let total = snippets_total(duration, segment_ms);
    if total == 0 {
        return Ok(ProgressReport::default());
    }
    let snippets = counts(total, remaining_snippets(store, at)?.len() as u64);
    let reviews = counts(total - 1, remaining_reviews(store, at)?.len() as u64);
    Ok(ProgressReport { snippets, reviews })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_rounds_up_partial_units() {
        assert_eq!(snippets_total(150_000, 60_000), 3);
        assert_eq!(snippets_total(90_000, 60_000), 2);
        assert_eq!(snippets_total(120_000, 60_000), 2);
        assert_eq!(snippets_total(0, 60_000), 0);
        assert_eq!(snippets_total(60_000, 0), 0);
    }

    #[test]
    fn percent_uses_floor_division() {
        let c = counts(3, 2);
        assert_eq!(c.completed, 1);
        assert_eq!(c.percent, 33);
        let done = counts(3, 0);
        assert_eq!(done.percent, 100);
    }

    #[test]
    fn zero_total_is_all_zero() {
        assert_eq!(counts(0, 5), ProgressCounts::default());
    }

    #[test]
    fn remaining_larger_than_total_saturates() {
        let c = counts(2, 5);
        assert_eq!(c.completed, 0);
        assert_eq!(c.percent, 0);
    }
}
