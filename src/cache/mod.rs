use std::collections::HashMap;
use std::sync::RwLock;

use tracing::trace;

/// Cached derived content plus its modification time (epoch seconds).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    pub content: String,
    pub mtime: i64,
}

/// Process-wide memoization table for expensive derived views.
///
/// Callers build keys that embed every input affecting the output, at
/// minimum the revision identifier, so entries never go stale: a new
/// revision simply produces new keys. There is no eviction.
pub struct ViewCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ViewCache {
    pub fn new() -> Self {
        ViewCache {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let entries = self.entries.read().ok()?;
        let hit = entries.get(key).cloned();
        trace!(key, hit = hit.is_some(), "cache lookup");
        hit
    }

    pub fn put(&self, key: impl Into<String>, content: impl Into<String>, mtime: i64) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                key.into(),
                CacheEntry {
                    content: content.into(),
                    mtime,
                },
            );
        }
    }

    /// Return the cached entry for `key`, computing and storing it on a
    /// miss. With `bypass` set the read path is skipped but the fresh
    /// result is still stored, so later requests benefit.
    pub fn fetch<F, E>(&self, key: &str, bypass: bool, compute: F) -> Result<CacheEntry, E>
    where
        F: FnOnce() -> Result<(String, i64), E>,
    {
        if !bypass {
            if let Some(entry) = self.get(key) {
                return Ok(entry);
            }
        }
        let (content, mtime) = compute()?;
        self.put(key, content.clone(), mtime);
        Ok(CacheEntry { content, mtime })
    }

    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(entries) => entries.len(),
            Err(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ViewCache {
    fn default() -> Self {
        Self::new()
    }
}
