mod secret;
mod table;

pub use secret::fresh_secret;
pub use table::{LockKind, LockTable, UnitLock};
