//! Human-readable labels for millisecond offsets into the recording.

/// Position label used in commit messages and feeds, e.g. `2:05`.
pub fn label_from_ms(ms: u64) -> String {
    let seconds = ms / 1000;
    let minutes = seconds / 60;
    format!("{}:{:02}", minutes, seconds % 60)
}

/// Fragment anchor for deep links into a rendered transcript, e.g. `2m05s`.
pub fn anchor_from_ms(ms: u64) -> String {
    let seconds = ms / 1000;
    let minutes = seconds / 60;
    format!("{}m{:02}s", minutes, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label() {
        assert_eq!(label_from_ms(0), "0:00");
        assert_eq!(label_from_ms(60_000), "1:00");
        assert_eq!(label_from_ms(125_000), "2:05");
        assert_eq!(label_from_ms(3_600_000), "60:00");
    }

    #[test]
    fn anchor() {
        assert_eq!(anchor_from_ms(0), "0m00s");
        assert_eq!(anchor_from_ms(125_000), "2m05s");
    }

    #[test]
    fn sub_second_offsets_floor() {
        assert_eq!(label_from_ms(999), "0:00");
        assert_eq!(label_from_ms(61_500), "1:01");
    }
}
