mod cache;
mod engine;
mod history;
mod identity;
mod index;
mod locks;
mod resources;
mod store;
mod timecode;

pub use cache::{CacheEntry, ViewCache};
pub use engine::{AcquireOutcome, Coordinator, EngineError, LockGrant};
pub use history::{
    activity_feed, changed_units_since, completion_milestones, grouped_contributions,
    unit_contributors, ActivityEntry, AuthorContributions, ContributionWindow, Milestone,
    MilestoneKind, DEFAULT_MESSAGES,
};
pub use identity::Identity;
pub use index::{
    progress, remaining_reviews, remaining_snippets, snippets_total, ProgressCounts,
    ProgressReport, RemainingSet, TranscriptionInfo,
};
pub use locks::{fresh_secret, LockKind, LockTable, UnitLock};
pub use resources::{
    offset_from_resource, snippet_resource, LOCKS, REMAINING_REVIEWS, REMAINING_SNIPPETS,
    TRANSCRIPTION_INFO,
};
pub use store::{Changeset, InMemoryStore, Revision, RevisionId, StoreError, VersionedStore};
pub use timecode::{anchor_from_ms, label_from_ms};
