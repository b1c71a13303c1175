use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resources::TRANSCRIPTION_INFO;
use crate::store::{RevisionId, StoreError, VersionedStore};

/// Recording metadata stored under `transcription.json`.
///
/// Only the duration matters to the engine; all other fields pass
/// through untouched for the rendering layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionInfo {
    /// Total recording length in milliseconds. Absent duration degrades
    /// every progress figure to zero rather than erroring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TranscriptionInfo {
    pub fn with_duration(duration: u64) -> Self {
        TranscriptionInfo {
            duration: Some(duration),
            extra: Map::new(),
        }
    }

    /// Read the metadata as of revision `at`. A store without the
    /// resource reads as default (no duration).
    pub fn load<S: VersionedStore>(store: &S, at: &RevisionId) -> Result<Self, StoreError> {
        match store.read(TRANSCRIPTION_INFO, at)? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                resource: TRANSCRIPTION_INFO.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(TranscriptionInfo::default()),
        }
    }

    pub fn to_json(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_pass_through() {
        let json = br#"{"duration": 150000, "title": "Episode 12"}"#;
        let info: TranscriptionInfo = serde_json::from_slice(json).unwrap();
        assert_eq!(info.duration, Some(150_000));
        assert_eq!(info.extra["title"], "Episode 12");

        let back = info.to_json();
        let reparsed: TranscriptionInfo = serde_json::from_slice(&back).unwrap();
        assert_eq!(reparsed, info);
    }

    #[test]
    fn missing_duration_is_none() {
        let info: TranscriptionInfo = serde_json::from_slice(b"{}").unwrap();
        assert_eq!(info.duration, None);
    }
}
