mod info;
mod progress;
mod remaining;

pub use info::TranscriptionInfo;
pub use progress::{progress, snippets_total, ProgressCounts, ProgressReport};
pub use remaining::RemainingSet;

use crate::resources::{REMAINING_REVIEWS, REMAINING_SNIPPETS};
use crate::store::{RevisionId, StoreError, VersionedStore};

/// Offsets not yet transcribed, as of revision `at`.
pub fn remaining_snippets<S: VersionedStore>(
    store: &S,
    at: &RevisionId,
) -> Result<RemainingSet, StoreError> {
    RemainingSet::load(store, REMAINING_SNIPPETS, at)
}

/// Offsets not yet reviewed as a pair, as of revision `at`.
pub fn remaining_reviews<S: VersionedStore>(
    store: &S,
    at: &RevisionId,
) -> Result<RemainingSet, StoreError> {
    RemainingSet::load(store, REMAINING_REVIEWS, at)
}
