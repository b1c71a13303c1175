use std::collections::BTreeSet;

use crate::index::{remaining_reviews, remaining_snippets, snippets_total, TranscriptionInfo};
use crate::resources::{REMAINING_REVIEWS, REMAINING_SNIPPETS};
use crate::store::{RevisionId, StoreError, VersionedStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MilestoneKind {
    Snippets,
    Reviews,
}

/// First revision at which a completion percentage crossed a reporting
/// threshold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Milestone {
    pub kind: MilestoneKind,
    pub percent: u64,
    pub revision: RevisionId,
    pub timestamp: i64,
}

fn thresholds(percentage_step: u64) -> BTreeSet<u64> {
    let mut marks: BTreeSet<u64> = (1..)
        .map(|i| i * percentage_step)
        .take_while(|p| *p < 100)
        .collect();
    marks.insert(100);
    marks
}

/// Completion milestones over the transcription's history, newest
/// first (feed order).
///
/// Scans only revisions that touched the remaining-set resources, in
/// chronological order, and reports each multiple of `percentage_step`
/// (plus 100) the first time it is reached. At most one milestone per
/// revision; snippet completion is checked before review completion.
pub fn completion_milestones<S: VersionedStore>(
    store: &S,
    from: &RevisionId,
    segment_ms: u64,
    percentage_step: u64,
) -> Result<Vec<Milestone>, StoreError> {
    if percentage_step == 0 {
        return Ok(Vec::new());
    }
    let info = TranscriptionInfo::load(store, from)?;
    let total = snippets_total(info.duration.unwrap_or(0), segment_ms);
    if total == 0 {
        return Ok(Vec::new());
    }
    let reviews_total = total - 1;

    let mut snippet_marks = thresholds(percentage_step);
    let mut review_marks = thresholds(percentage_step);
    let mut milestones = Vec::new();

    let mut revisions = store.history_touching(from, &[REMAINING_SNIPPETS, REMAINING_REVIEWS])?;
    revisions.reverse(); // scan oldest first

    for revision in revisions {
        let snippets_done = total.saturating_sub(remaining_snippets(store, &revision.id)?.len() as u64);
        let snippets_percent = snippets_done * 100 / total;
        if snippet_marks.remove(&snippets_percent) {
            milestones.push(Milestone {
                kind: MilestoneKind::Snippets,
                percent: snippets_percent,
                revision: revision.id,
                timestamp: revision.timestamp,
            });
            continue;
        }
        if reviews_total == 0 {
            continue;
        }
        let reviews_done =
            reviews_total.saturating_sub(remaining_reviews(store, &revision.id)?.len() as u64);
        let reviews_percent = reviews_done * 100 / reviews_total;
        if review_marks.remove(&reviews_percent) {
            milestones.push(Milestone {
                kind: MilestoneKind::Reviews,
                percent: reviews_percent,
                revision: revision.id,
                timestamp: revision.timestamp,
            });
        }
    }

    milestones.reverse();
    Ok(milestones)
}
