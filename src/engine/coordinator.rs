use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use super::{AcquireOutcome, EngineError, LockGrant};
use crate::identity::Identity;
use crate::index::{
    remaining_reviews, remaining_snippets, snippets_total, RemainingSet, TranscriptionInfo,
};
use crate::locks::{fresh_secret, LockKind, LockTable, UnitLock};
use crate::resources::{
    snippet_resource, LOCKS, REMAINING_REVIEWS, REMAINING_SNIPPETS, TRANSCRIPTION_INFO,
};
use crate::store::{Changeset, RevisionId, StoreError, VersionedStore};
use crate::timecode::label_from_ms;

const NO_SNIPPETS: &str = "no available snippets";
const NO_REVIEWS: &str = "no available reviews";
const TRY_AGAIN: &str = "try again";

/// The serialized critical section over one versioned store.
///
/// Every read-modify-write of the store's index structures (lock table,
/// remaining sets) runs while holding the commit gate, so mutations
/// form a strict total order matching revision order. The gate is held
/// only across one index read plus one commit, never across a caller
/// round-trip, and is released on every exit path. Read-only queries go
/// straight to the store against a pinned revision.
pub struct Coordinator<S> {
    store: S,
    segment_ms: u64,
    gate: Mutex<()>,
}

impl<S: VersionedStore> Coordinator<S> {
    pub fn new(store: S, segment_ms: u64) -> Self {
        Coordinator {
            store,
            segment_ms,
            gate: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn segment_ms(&self) -> u64 {
        self.segment_ms
    }

    /// Seed an empty store: recording metadata, the full remaining
    /// sets, and an empty lock table, as one initial revision.
    ///
    /// Every unit is initially unclaimed; the last unit never enters
    /// the review set because it has no following pair.
    pub fn bootstrap(
        &self,
        info: &TranscriptionInfo,
        identity: &Identity,
    ) -> Result<RevisionId, EngineError> {
        let total = snippets_total(info.duration.unwrap_or(0), self.segment_ms);
        let snippets = RemainingSet::from_offsets((0..total).map(|i| i * self.segment_ms));
        let reviews =
            RemainingSet::from_offsets((0..total.saturating_sub(1)).map(|i| i * self.segment_ms));

        let _gate = self.enter_gate()?;
        let mut changes = Changeset::new();
        changes.write(TRANSCRIPTION_INFO, info.to_json());
        changes.write(REMAINING_SNIPPETS, snippets.to_json());
        changes.write(REMAINING_REVIEWS, reviews.to_json());
        changes.write(LOCKS, LockTable::new().to_json());
        let revision = self
            .store
            .commit(changes, identity, "transcription: initialized")?;
        debug!(units = total, revision = %revision, "store bootstrapped");
        Ok(revision)
    }

    /// Claim an untranscribed unit. With `desired` set, that exact
    /// offset is claimed or the attempt reports unavailable.
    pub fn acquire_snippet(
        &self,
        desired: Option<u64>,
        identity: &Identity,
    ) -> Result<AcquireOutcome, EngineError> {
        self.acquire_snippet_seeded(desired, identity, clock_seed())
    }

    /// [`acquire_snippet`](Self::acquire_snippet) with an explicit seed
    /// for the random choice, for reproducible selection.
    pub fn acquire_snippet_seeded(
        &self,
        desired: Option<u64>,
        identity: &Identity,
        seed: u64,
    ) -> Result<AcquireOutcome, EngineError> {
        if let Some(offset) = desired {
            self.check_aligned(offset)?;
        }

        let _gate = self.enter_gate()?;
        let tip = self.store.current_revision()?;
        let remaining = remaining_snippets(&self.store, &tip)?;
        let mut locks = LockTable::load(&self.store, &tip)?;

        let eligible: Vec<u64> = remaining
            .iter()
            .filter(|&o| !locks.is_locked(LockKind::Snippet, o))
            .collect();
        let chosen = match pick(desired, &eligible, seed, NO_SNIPPETS) {
            Ok(offset) => offset,
            Err(outcome) => return Ok(outcome),
        };

        let secret = fresh_secret();
        locks.insert(UnitLock {
            kind: LockKind::Snippet,
            offset: chosen,
            secret: secret.clone(),
            holder: identity.clone(),
            created: unix_now(),
        });

        let mut changes = Changeset::new();
        changes.write(LOCKS, locks.to_json());
        let message = format!(
            "snippet: {}, locked by {}",
            label_from_ms(chosen),
            identity.name
        );
        let revision = self.store.commit(changes, identity, &message)?;
        debug!(offset = chosen, revision = %revision, "snippet lock acquired");

        let text = self.read_text(chosen, &revision)?;
        Ok(AcquireOutcome::Acquired(LockGrant {
            kind: LockKind::Snippet,
            starting_point: chosen,
            ending_point: chosen + self.segment_ms,
            secret,
            text,
            paired_text: None,
            revision,
        }))
    }

    /// Claim a pair of adjacent transcribed units for review. The
    /// following unit must itself be free of review locks; the claim
    /// reserves both until save or cancel.
    pub fn acquire_review(
        &self,
        desired: Option<u64>,
        identity: &Identity,
    ) -> Result<AcquireOutcome, EngineError> {
        self.acquire_review_seeded(desired, identity, clock_seed())
    }

    /// [`acquire_review`](Self::acquire_review) with an explicit seed.
    pub fn acquire_review_seeded(
        &self,
        desired: Option<u64>,
        identity: &Identity,
        seed: u64,
    ) -> Result<AcquireOutcome, EngineError> {
        if let Some(offset) = desired {
            self.check_aligned(offset)?;
        }

        let _gate = self.enter_gate()?;
        let tip = self.store.current_revision()?;
        let remaining = remaining_reviews(&self.store, &tip)?;
        let mut locks = LockTable::load(&self.store, &tip)?;

        // A review spans two consecutive units, so an offset is only
        // eligible while neither unit of its pair is claimed by any
        // active review, including one holding the offset as its pair.
        let eligible: Vec<u64> = remaining
            .iter()
            .filter(|&o| {
                !locks.is_locked(LockKind::Review, o)
                    && !locks.is_locked(LockKind::Review, o + self.segment_ms)
                    && (o < self.segment_ms
                        || !locks.is_locked(LockKind::Review, o - self.segment_ms))
            })
            .collect();
        let chosen = match pick(desired, &eligible, seed, NO_REVIEWS) {
            Ok(offset) => offset,
            Err(outcome) => return Ok(outcome),
        };

        let secret = fresh_secret();
        locks.insert(UnitLock {
            kind: LockKind::Review,
            offset: chosen,
            secret: secret.clone(),
            holder: identity.clone(),
            created: unix_now(),
        });

        let mut changes = Changeset::new();
        changes.write(LOCKS, locks.to_json());
        let message = format!(
            "review: {}, locked by {}",
            label_from_ms(chosen),
            identity.name
        );
        let revision = self.store.commit(changes, identity, &message)?;
        debug!(offset = chosen, revision = %revision, "review lock acquired");

        let text = self.read_text(chosen, &revision)?;
        let paired_text = self.read_text(chosen + self.segment_ms, &revision)?;
        Ok(AcquireOutcome::Acquired(LockGrant {
            kind: LockKind::Review,
            starting_point: chosen,
            ending_point: chosen + 2 * self.segment_ms,
            secret,
            text,
            paired_text: Some(paired_text),
            revision,
        }))
    }

    /// Save the transcript of a locked snippet and release the lock.
    ///
    /// Empty text is a legal "no transcript yet" value: it is written,
    /// but the unit stays in the remaining set.
    pub fn save_snippet(
        &self,
        offset: u64,
        secret: &str,
        text: &str,
        identity: &Identity,
    ) -> Result<RevisionId, EngineError> {
        self.check_aligned(offset)?;
        let _gate = self.enter_gate()?;
        let tip = self.store.current_revision()?;
        let mut locks = LockTable::load(&self.store, &tip)?;
        if !locks.validate(LockKind::Snippet, offset, secret) {
            return Err(EngineError::LockInvalid {
                kind: LockKind::Snippet,
                offset,
            });
        }
        locks.remove(LockKind::Snippet, offset);

        let mut changes = Changeset::new();
        changes.write(snippet_resource(offset), text.as_bytes().to_vec());
        if !text.is_empty() {
            let mut remaining = remaining_snippets(&self.store, &tip)?;
            remaining.remove(offset);
            changes.write(REMAINING_SNIPPETS, remaining.to_json());
        }
        changes.write(LOCKS, locks.to_json());

        let message = format!(
            "snippet: {}, saved by {}",
            label_from_ms(offset),
            identity.name
        );
        let revision = self.store.commit(changes, identity, &message)?;
        debug!(offset, revision = %revision, "snippet saved");
        Ok(revision)
    }

    /// Save both transcripts of a locked review pair, drop the pair
    /// from the remaining reviews, and release the lock, all in one
    /// revision.
    pub fn save_review(
        &self,
        offset: u64,
        secret: &str,
        text: &str,
        paired_text: &str,
        identity: &Identity,
    ) -> Result<RevisionId, EngineError> {
        self.check_aligned(offset)?;
        let _gate = self.enter_gate()?;
        let tip = self.store.current_revision()?;
        let mut locks = LockTable::load(&self.store, &tip)?;
        if !locks.validate(LockKind::Review, offset, secret) {
            return Err(EngineError::LockInvalid {
                kind: LockKind::Review,
                offset,
            });
        }
        locks.remove(LockKind::Review, offset);

        let mut remaining = remaining_reviews(&self.store, &tip)?;
        remaining.remove(offset);

        let mut changes = Changeset::new();
        changes.write(snippet_resource(offset), text.as_bytes().to_vec());
        changes.write(
            snippet_resource(offset + self.segment_ms),
            paired_text.as_bytes().to_vec(),
        );
        changes.write(REMAINING_REVIEWS, remaining.to_json());
        changes.write(LOCKS, locks.to_json());

        let message = format!(
            "review: {}, saved by {}",
            label_from_ms(offset),
            identity.name
        );
        let revision = self.store.commit(changes, identity, &message)?;
        debug!(offset, revision = %revision, "review saved");
        Ok(revision)
    }

    /// Release a lock without touching text or remaining sets.
    pub fn cancel(
        &self,
        kind: LockKind,
        offset: u64,
        secret: &str,
        identity: &Identity,
    ) -> Result<RevisionId, EngineError> {
        self.check_aligned(offset)?;
        let _gate = self.enter_gate()?;
        let tip = self.store.current_revision()?;
        let mut locks = LockTable::load(&self.store, &tip)?;
        if !locks.validate(kind, offset, secret) {
            return Err(EngineError::LockInvalid { kind, offset });
        }
        locks.remove(kind, offset);

        let mut changes = Changeset::new();
        changes.write(LOCKS, locks.to_json());
        let message = format!(
            "{}: {}, cancel by {}",
            kind,
            label_from_ms(offset),
            identity.name
        );
        let revision = self.store.commit(changes, identity, &message)?;
        debug!(offset, kind = %kind, revision = %revision, "lock canceled");
        Ok(revision)
    }

    fn enter_gate(&self) -> Result<MutexGuard<'_, ()>, EngineError> {
        self.gate.lock().map_err(|_| {
            EngineError::Store(StoreError::Unavailable("commit gate poisoned".to_string()))
        })
    }

    fn check_aligned(&self, offset: u64) -> Result<(), EngineError> {
        if self.segment_ms == 0 || offset % self.segment_ms != 0 {
            return Err(EngineError::MisalignedOffset {
                offset,
                segment_ms: self.segment_ms,
            });
        }
        Ok(())
    }

    fn read_text(&self, offset: u64, at: &RevisionId) -> Result<String, EngineError> {
        let bytes = self.store.read(&snippet_resource(offset), at)?;
        Ok(bytes
            .map(|b| String::from_utf8_lossy(&b).into_owned())
            .unwrap_or_default())
    }
}

/// Choose the claimed offset from the eligible set. The random branch
/// uses its own PRNG instance built from `seed`, so concurrent calls
/// stay independent and a given seed reproduces its choice.
fn pick(
    desired: Option<u64>,
    eligible: &[u64],
    seed: u64,
    none_reason: &str,
) -> Result<u64, AcquireOutcome> {
    match desired {
        Some(offset) if eligible.contains(&offset) => Ok(offset),
        Some(_) => Err(AcquireOutcome::unavailable(TRY_AGAIN)),
        None => {
            let mut rng = StdRng::seed_from_u64(seed);
            eligible
                .choose(&mut rng)
                .copied()
                .ok_or_else(|| AcquireOutcome::unavailable(none_reason))
        }
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
