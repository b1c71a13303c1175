use std::fmt;

/// Error type for versioned-store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not be read or written. Fatal for the current
    /// request; no partial revision may remain.
    Unavailable(String),
    /// The given revision identifier does not exist in this store.
    UnknownRevision(String),
    /// A stored resource failed validation on read.
    Corrupt { resource: String, reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
            StoreError::UnknownRevision(id) => write!(f, "unknown revision: {}", id),
            StoreError::Corrupt { resource, reason } => {
                write!(f, "corrupt resource {}: {}", resource, reason)
            }
        }
    }
}

impl std::error::Error for StoreError {}
