use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::activity::{entry_from, touched_units, ActivityEntry};
use crate::identity::Identity;
use crate::store::{RevisionId, StoreError, VersionedStore};

/// Fallback acknowledgment templates when the store carries none.
/// Placeholders are substituted by the rendering layer.
pub const DEFAULT_MESSAGES: &[&str] =
    &["Kudos to ${author_name} for ${contributions} recent contributions"];

/// Contributions of one author within one time window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorContributions {
    pub author: Identity,
    /// This author's activity in the window, most recent first.
    pub actions: Vec<ActivityEntry>,
    /// Acknowledgment template chosen for this author. The choice is
    /// seeded by the author's most recent action timestamp in the
    /// window, so regenerating the feed over unchanged history picks
    /// the same message.
    pub message: String,
}

/// Work-unit activity grouped into one fixed time window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContributionWindow {
    /// Window start: timestamp floored to the window size.
    pub window_start: i64,
    /// One entry per contributing author, ordered by author name.
    pub authors: Vec<AuthorContributions>,
}

/// Group recent work-unit activity into time windows per author and
/// select one acknowledgment message for each (window, author) pair.
///
/// Walks backward from `from`, stopping at revisions older than the
/// window-aligned `reference_timestamp` minus `lookback_seconds`.
/// Windows are returned oldest first. An empty `messages` slice falls
/// back to [`DEFAULT_MESSAGES`].
pub fn grouped_contributions<S: VersionedStore>(
    store: &S,
    from: &RevisionId,
    window_seconds: i64,
    lookback_seconds: i64,
    reference_timestamp: i64,
    messages: &[&str],
) -> Result<Vec<ContributionWindow>, StoreError> {
    if window_seconds <= 0 {
        return Ok(Vec::new());
    }
    let messages = if messages.is_empty() {
        DEFAULT_MESSAGES
    } else {
        messages
    };

    // End of the last whole window before the current partial one.
    let max_timestamp = reference_timestamp - reference_timestamp.rem_euclid(window_seconds);
    let min_timestamp = max_timestamp - lookback_seconds;

    let mut windows: BTreeMap<i64, BTreeMap<String, AuthorContributions>> = BTreeMap::new();
    for revision in store.history(from)? {
        if revision.timestamp < min_timestamp {
            break;
        }
        let touched = touched_units(store, &revision.id)?;
        let earliest = match touched.iter().next() {
            Some(&offset) => offset,
            None => continue,
        };
        let window_start = revision.timestamp - revision.timestamp.rem_euclid(window_seconds);
        let authors = windows.entry(window_start).or_default();
        let slot = authors
            .entry(revision.author.name.clone())
            .or_insert_with(|| AuthorContributions {
                author: revision.author.clone(),
                actions: Vec::new(),
                message: String::new(),
            });
        slot.actions.push(entry_from(&revision, earliest));
    }

    let windows = windows
        .into_iter()
        .map(|(window_start, authors)| ContributionWindow {
            window_start,
            authors: authors
                .into_values()
                .map(|mut slot| {
                    // Backward walk: the first recorded action is the
                    // most recent, and its timestamp seeds the choice.
                    let seed = slot.actions[0].timestamp as u64;
                    let mut rng = StdRng::seed_from_u64(seed);
                    slot.message = messages
                        .choose(&mut rng)
                        .map(|m| m.trim().to_string())
                        .unwrap_or_default();
                    slot
                })
                .collect(),
        })
        .collect();
    Ok(windows)
}
