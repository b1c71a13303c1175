use std::fmt;

use crate::locks::LockKind;
use crate::store::StoreError;

/// Error type for mutating engine operations.
///
/// Finding no eligible unit is not an error; see
/// [`AcquireOutcome`](super::AcquireOutcome).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A save or cancel presented a secret matching no active lock for
    /// the (kind, offset) pair: stale, replayed, or forged. Rejected
    /// before any write.
    LockInvalid { kind: LockKind, offset: u64 },
    /// The offset does not sit on the segment grid.
    MisalignedOffset { offset: u64, segment_ms: u64 },
    /// The versioned store failed; fatal for the current request.
    Store(StoreError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::LockInvalid { kind, offset } => {
                write!(f, "invalid or stale {} lock for offset {}", kind, offset)
            }
            EngineError::MisalignedOffset { offset, segment_ms } => write!(
                f,
                "offset {} is not a multiple of the {} ms segment length",
                offset, segment_ms
            ),
            EngineError::Store(e) => write!(f, "store error: {}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        EngineError::Store(e)
    }
}
