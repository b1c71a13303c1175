use crate::locks::LockKind;
use crate::store::RevisionId;

/// Result of a lock acquisition attempt.
///
/// Not acquiring is a normal outcome with a human-readable reason,
/// never an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AcquireOutcome {
    Acquired(LockGrant),
    Unavailable { reason: String },
}

impl AcquireOutcome {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        AcquireOutcome::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn grant(&self) -> Option<&LockGrant> {
        match self {
            AcquireOutcome::Acquired(grant) => Some(grant),
            AcquireOutcome::Unavailable { .. } => None,
        }
    }
}

/// A successfully acquired work-unit lock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockGrant {
    pub kind: LockKind,
    pub starting_point: u64,
    /// End of the claimed span: one segment past the start for a
    /// snippet, two for a review.
    pub ending_point: u64,
    /// Proof of ownership, required by every later save or cancel.
    pub secret: String,
    /// Stored text of the unit (first unit of the pair for a review).
    pub text: String,
    /// Stored text of the following unit; review grants only.
    pub paired_text: Option<String>,
    /// Revision created by the acquisition.
    pub revision: RevisionId,
}
