use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::resources::LOCKS;
use crate::store::{RevisionId, StoreError, VersionedStore};

/// Which action a work-unit lock covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockKind {
    Snippet,
    Review,
}

impl LockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockKind::Snippet => "snippet",
            LockKind::Review => "review",
        }
    }
}

impl fmt::Display for LockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ephemeral claim on a work unit.
///
/// Lives in store state between acquisition and release, so locks are
/// versioned like everything else and survive process restarts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitLock {
    pub kind: LockKind,
    pub offset: u64,
    pub secret: String,
    pub holder: Identity,
    /// Acquisition time, seconds since the Unix epoch.
    pub created: i64,
}

/// All active locks, persisted under `locks.json`.
///
/// Invariant: at most one lock per (kind, offset) pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockTable {
    locks: Vec<UnitLock>,
}

impl LockTable {
    pub fn new() -> Self {
        LockTable::default()
    }

    /// Read and validate the table at revision `at`. A store without
    /// the resource reads as an empty table.
    pub fn load<S: VersionedStore>(store: &S, at: &RevisionId) -> Result<Self, StoreError> {
        match store.read(LOCKS, at)? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                resource: LOCKS.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(LockTable::new()),
        }
    }

    pub fn to_json(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }

    pub fn get(&self, kind: LockKind, offset: u64) -> Option<&UnitLock> {
        self.locks
            .iter()
            .find(|l| l.kind == kind && l.offset == offset)
    }

    pub fn is_locked(&self, kind: LockKind, offset: u64) -> bool {
        self.get(kind, offset).is_some()
    }

    /// True iff a lock exists for (kind, offset) with exactly this
    /// secret. The gate in front of every mutation.
    pub fn validate(&self, kind: LockKind, offset: u64, secret: &str) -> bool {
        self.get(kind, offset).is_some_and(|l| l.secret == secret)
    }

    /// Record a lock. Returns `false` (and changes nothing) if the
    /// (kind, offset) pair is already held.
    pub fn insert(&mut self, lock: UnitLock) -> bool {
        if self.is_locked(lock.kind, lock.offset) {
            return false;
        }
        self.locks.push(lock);
        true
    }

    pub fn remove(&mut self, kind: LockKind, offset: u64) -> Option<UnitLock> {
        let idx = self
            .locks
            .iter()
            .position(|l| l.kind == kind && l.offset == offset)?;
        Some(self.locks.remove(idx))
    }

    /// Offsets currently locked for `kind`.
    pub fn locked_offsets(&self, kind: LockKind) -> BTreeSet<u64> {
        self.locks
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.offset)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
