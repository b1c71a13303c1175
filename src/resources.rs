//! Resource naming conventions inside the versioned store.
//!
//! Each work unit's transcript lives under a fixed-width, zero-padded
//! name so that unit resources can be told apart from everything else
//! stored alongside them (speaker maps, style sheets, metadata).

/// JSON array of offsets not yet transcribed.
pub const REMAINING_SNIPPETS: &str = "remaining_snippets.json";

/// JSON array of offsets not yet reviewed as a pair.
pub const REMAINING_REVIEWS: &str = "remaining_reviews.json";

/// Active lock table.
pub const LOCKS: &str = "locks.json";

/// Recording metadata (total duration, etc.).
pub const TRANSCRIPTION_INFO: &str = "transcription.json";

const OFFSET_WIDTH: usize = 16;
const UNIT_SUFFIX: &str = ".txt";

/// Resource name holding the transcript of the unit at `offset`.
pub fn snippet_resource(offset: u64) -> String {
    format!("{:016}{}", offset, UNIT_SUFFIX)
}

/// Inverse of [`snippet_resource`]; `None` for anything that is not a
/// work-unit resource name.
pub fn offset_from_resource(name: &str) -> Option<u64> {
    let stem = name.strip_suffix(UNIT_SUFFIX)?;
    if stem.len() != OFFSET_WIDTH || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        assert_eq!(snippet_resource(0), "0000000000000000.txt");
        assert_eq!(snippet_resource(60_000), "0000000000060000.txt");
        assert_eq!(offset_from_resource("0000000000060000.txt"), Some(60_000));
    }

    #[test]
    fn rejects_other_resources() {
        assert_eq!(offset_from_resource("custom.css"), None);
        assert_eq!(offset_from_resource("speakers.txt"), None);
        assert_eq!(offset_from_resource("remaining_snippets.json"), None);
        // Right suffix, wrong width.
        assert_eq!(offset_from_resource("060000.txt"), None);
        // Right width, non-digit characters.
        assert_eq!(offset_from_resource("000000000006000x.txt"), None);
    }
}
