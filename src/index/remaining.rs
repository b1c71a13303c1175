use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::store::{RevisionId, StoreError, VersionedStore};

/// Set of work-unit offsets not yet completed for one action kind.
///
/// Persisted as a JSON array of integers. Order carries no meaning; the
/// serialized form is kept sorted so revision diffs stay stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemainingSet {
    offsets: BTreeSet<u64>,
}

impl RemainingSet {
    pub fn new() -> Self {
        RemainingSet::default()
    }

    pub fn from_offsets(offsets: impl IntoIterator<Item = u64>) -> Self {
        RemainingSet {
            offsets: offsets.into_iter().collect(),
        }
    }

    /// Read and validate the set stored under `resource` at revision
    /// `at`. A missing resource reads as an empty set.
    pub fn load<S: VersionedStore>(
        store: &S,
        resource: &str,
        at: &RevisionId,
    ) -> Result<Self, StoreError> {
        match store.read(resource, at)? {
            Some(bytes) => Self::from_json(resource, &bytes),
            None => Ok(RemainingSet::new()),
        }
    }

    pub fn from_json(resource: &str, bytes: &[u8]) -> Result<Self, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Corrupt {
            resource: resource.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Vec<u8> {
        // Serializing a set of integers cannot fail.
        serde_json::to_vec(self).unwrap_or_default()
    }

    pub fn contains(&self, offset: u64) -> bool {
        self.offsets.contains(&offset)
    }

    /// Returns `true` if the offset was newly inserted.
    pub fn insert(&mut self, offset: u64) -> bool {
        self.offsets.insert(offset)
    }

    /// Returns `true` if the offset was present.
    pub fn remove(&mut self, offset: u64) -> bool {
        self.offsets.remove(&offset)
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Offsets in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.offsets.iter().copied()
    }
}
