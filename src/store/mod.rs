mod changeset;
mod error;
mod in_memory;
mod revision;
mod store;

pub use changeset::Changeset;
pub use error::StoreError;
pub use in_memory::InMemoryStore;
pub use revision::{Revision, RevisionId};
pub use store::VersionedStore;
