use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// Opaque identifier of one immutable revision.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RevisionId(String);

impl RevisionId {
    pub fn new(id: impl Into<String>) -> Self {
        RevisionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata of one committed revision. The snapshot itself is read
/// through [`VersionedStore::read`](super::VersionedStore::read).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Revision {
    pub id: RevisionId,
    pub parent: Option<RevisionId>,
    pub author: Identity,
    /// Authored time, seconds since the Unix epoch.
    pub timestamp: i64,
    pub message: String,
}
