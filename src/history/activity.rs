use std::collections::BTreeSet;

use crate::identity::Identity;
use crate::resources::{offset_from_resource, snippet_resource};
use crate::store::{Revision, RevisionId, StoreError, VersionedStore};
use crate::timecode::{anchor_from_ms, label_from_ms};

/// One feed entry derived from a revision that touched work units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityEntry {
    pub revision: RevisionId,
    pub author: Identity,
    /// Authored time, seconds since the Unix epoch.
    pub timestamp: i64,
    /// Earliest offset touched by the revision.
    pub starting_point: u64,
    /// `M:SS` position label.
    pub position: String,
    /// `MmSSs` fragment anchor for deep links.
    pub anchor: String,
}

/// Work-unit offsets changed by revision `rev`.
pub fn touched_units<S: VersionedStore>(
    store: &S,
    rev: &RevisionId,
) -> Result<BTreeSet<u64>, StoreError> {
    Ok(store
        .changed_resources(rev)?
        .iter()
        .filter_map(|name| offset_from_resource(name))
        .collect())
}

/// Offsets touched by any revision strictly after `since`, walking
/// backward from `from`. An unreachable `since` collects the whole
/// history.
pub fn changed_units_since<S: VersionedStore>(
    store: &S,
    from: &RevisionId,
    since: &RevisionId,
) -> Result<BTreeSet<u64>, StoreError> {
    let mut units = BTreeSet::new();
    for revision in store.history(from)? {
        if revision.id == *since {
            break;
        }
        units.extend(touched_units(store, &revision.id)?);
    }
    Ok(units)
}

pub(super) fn entry_from(revision: &Revision, starting_point: u64) -> ActivityEntry {
    ActivityEntry {
        revision: revision.id.clone(),
        author: revision.author.clone(),
        timestamp: revision.timestamp,
        starting_point,
        position: label_from_ms(starting_point),
        anchor: anchor_from_ms(starting_point),
    }
}

/// Chronological (oldest-first) activity over work units.
///
/// Walks backward from `from`; each revision touching at least one
/// unit yields one entry keyed by the earliest touched offset. The
/// walk stops after `max_items` entries, or at the first revision
/// older than `min_timestamp` when supplied.
pub fn activity_feed<S: VersionedStore>(
    store: &S,
    from: &RevisionId,
    max_items: usize,
    min_timestamp: Option<i64>,
) -> Result<Vec<ActivityEntry>, StoreError> {
    let mut entries = Vec::new();
    for revision in store.history(from)? {
        if let Some(min) = min_timestamp {
            if revision.timestamp < min {
                break;
            }
        }
        let touched = touched_units(store, &revision.id)?;
        if let Some(&earliest) = touched.iter().next() {
            entries.push(entry_from(&revision, earliest));
            if entries.len() >= max_items {
                break;
            }
        }
    }
    entries.reverse();
    Ok(entries)
}

/// Distinct author names that ever changed the unit at `offset`,
/// oldest contribution first.
pub fn unit_contributors<S: VersionedStore>(
    store: &S,
    from: &RevisionId,
    offset: u64,
) -> Result<Vec<String>, StoreError> {
    let resource = snippet_resource(offset);
    let mut names: Vec<String> = Vec::new();
    for revision in store.history_touching(from, &[&resource])? {
        if !names.contains(&revision.author.name) {
            names.push(revision.author.name);
        }
    }
    names.reverse();
    Ok(names)
}
