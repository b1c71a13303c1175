#![allow(dead_code)]

use chorale::{Coordinator, Identity, InMemoryStore, TranscriptionInfo};

pub const SEGMENT_MS: u64 = 60_000;

pub fn ada() -> Identity {
    Identity::new("Ada", "ada@example.org")
}

pub fn grace() -> Identity {
    Identity::new("Grace", "grace@example.org")
}

/// Coordinator over a deterministic in-memory store, bootstrapped for a
/// recording of `duration_ms`. Commits are stamped 1000, 1060, 1120, ...
pub fn coordinator(duration_ms: u64) -> Coordinator<InMemoryStore> {
    let coordinator = Coordinator::new(InMemoryStore::with_fixed_clock(1_000, 60), SEGMENT_MS);
    coordinator
        .bootstrap(&TranscriptionInfo::with_duration(duration_ms), &ada())
        .unwrap();
    coordinator
}
