mod coordinator;
mod error;
mod outcome;

pub use coordinator::Coordinator;
pub use error::EngineError;
pub use outcome::{AcquireOutcome, LockGrant};
