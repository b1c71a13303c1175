use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use super::{Changeset, Revision, RevisionId, StoreError, VersionedStore};
use crate::identity::Identity;

/// In-memory versioned store.
///
/// Each revision keeps a full snapshot map of resource name to content,
/// cloned from its parent and overlaid with the committed changeset.
/// Revisions are append-only; nothing is ever rewritten or dropped.
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

struct Inner {
    revisions: Vec<StoredRevision>,
    by_id: HashMap<String, usize>,
    clock: Clock,
}

struct StoredRevision {
    meta: Revision,
    snapshot: HashMap<String, Vec<u8>>,
    changed: BTreeSet<String>,
}

enum Clock {
    System,
    /// Deterministic clock: each commit is stamped `next`, then `next`
    /// advances by `step`. Used by tests and reproducible replays.
    Fixed { next: i64, step: i64 },
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore {
            inner: RwLock::new(Inner {
                revisions: Vec::new(),
                by_id: HashMap::new(),
                clock: Clock::System,
            }),
        }
    }

    /// Store whose commits are stamped `start`, `start + step`, ... in
    /// commit order instead of reading the system clock.
    pub fn with_fixed_clock(start: i64, step: i64) -> Self {
        InMemoryStore {
            inner: RwLock::new(Inner {
                revisions: Vec::new(),
                by_id: HashMap::new(),
                clock: Clock::Fixed { next: start, step },
            }),
        }
    }

    pub fn revision_count(&self) -> usize {
        match self.inner.read() {
            Ok(inner) => inner.revisions.len(),
            Err(_) => 0,
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    fn index_of(&self, rev: &RevisionId) -> Result<usize, StoreError> {
        self.by_id
            .get(rev.as_str())
            .copied()
            .ok_or_else(|| StoreError::UnknownRevision(rev.as_str().to_string()))
    }

    fn stamp(&mut self) -> i64 {
        match &mut self.clock {
            Clock::System => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0),
            Clock::Fixed { next, step } => {
                let now = *next;
                *next += *step;
                now
            }
        }
    }
}

fn poisoned(operation: &str) -> StoreError {
    StoreError::Unavailable(format!("store lock poisoned during {}", operation))
}

impl VersionedStore for InMemoryStore {
    fn current_revision(&self) -> Result<RevisionId, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned("read"))?;
        inner
            .revisions
            .last()
            .map(|r| r.meta.id.clone())
            .ok_or_else(|| StoreError::UnknownRevision("(empty store)".to_string()))
    }

    fn read(&self, resource: &str, at: &RevisionId) -> Result<Option<Vec<u8>>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned("read"))?;
        let idx = inner.index_of(at)?;
        Ok(inner.revisions[idx].snapshot.get(resource).cloned())
    }

    fn history(&self, from: &RevisionId) -> Result<Vec<Revision>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned("history"))?;
        let idx = inner.index_of(from)?;
        Ok(inner.revisions[..=idx]
            .iter()
            .rev()
            .map(|r| r.meta.clone())
            .collect())
    }

    fn history_touching(
        &self,
        from: &RevisionId,
        resources: &[&str],
    ) -> Result<Vec<Revision>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned("history"))?;
        let idx = inner.index_of(from)?;
        Ok(inner.revisions[..=idx]
            .iter()
            .rev()
            .filter(|r| resources.iter().any(|name| r.changed.contains(*name)))
            .map(|r| r.meta.clone())
            .collect())
    }

    fn changed_resources(&self, rev: &RevisionId) -> Result<BTreeSet<String>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned("read"))?;
        let idx = inner.index_of(rev)?;
        Ok(inner.revisions[idx].changed.clone())
    }

    fn commit(
        &self,
        changes: Changeset,
        author: &Identity,
        message: &str,
    ) -> Result<RevisionId, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned("commit"))?;
        let timestamp = inner.stamp();

        let (parent, mut snapshot) = match inner.revisions.last() {
            Some(tip) => (Some(tip.meta.id.clone()), tip.snapshot.clone()),
            None => (None, HashMap::new()),
        };

        let mut changed = BTreeSet::new();
        for (resource, bytes) in changes.into_writes() {
            changed.insert(resource.clone());
            snapshot.insert(resource, bytes);
        }

        let seq = inner.revisions.len();
        let id = RevisionId::new(format!("{:012x}", seq));
        let meta = Revision {
            id: id.clone(),
            parent,
            author: author.clone(),
            timestamp,
            message: message.to_string(),
        };

        inner.by_id.insert(id.as_str().to_string(), seq);
        inner.revisions.push(StoredRevision {
            meta,
            snapshot,
            changed,
        });
        Ok(id)
    }
}
