use std::collections::BTreeSet;

use super::{Changeset, Revision, RevisionId, StoreError};
use crate::identity::Identity;

/// Append-only, versioned history of named resources.
///
/// Every mutation lands as one immutable revision carrying author and
/// timestamp. Historical revisions never change once created; readers
/// pin a `RevisionId` and read against it; only the tip moves. The
/// default backend is [`InMemoryStore`](super::InMemoryStore); a
/// git-backed implementation would satisfy the same contract.
pub trait VersionedStore: Send + Sync {
    /// Identifier of the tip of the main line.
    fn current_revision(&self) -> Result<RevisionId, StoreError>;

    /// Content of `resource` as of revision `at`, or `None` if the
    /// resource does not exist there.
    fn read(&self, resource: &str, at: &RevisionId) -> Result<Option<Vec<u8>>, StoreError>;

    /// Revisions reachable from `from`, most recent first, `from`
    /// included.
    fn history(&self, from: &RevisionId) -> Result<Vec<Revision>, StoreError>;

    /// Like [`history`](Self::history), limited to revisions that
    /// changed at least one of `resources`.
    fn history_touching(
        &self,
        from: &RevisionId,
        resources: &[&str],
    ) -> Result<Vec<Revision>, StoreError>;

    /// Names of the resources changed by revision `rev` relative to its
    /// parent.
    fn changed_resources(&self, rev: &RevisionId) -> Result<BTreeSet<String>, StoreError>;

    /// Apply `changes` atomically as one new revision on the tip.
    fn commit(
        &self,
        changes: Changeset,
        author: &Identity,
        message: &str,
    ) -> Result<RevisionId, StoreError>;
}
