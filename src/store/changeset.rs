/// Staged resource writes, applied atomically by one commit.
///
/// Later writes to the same resource replace earlier ones within the
/// same changeset.
#[derive(Debug, Default)]
pub struct Changeset {
    writes: Vec<(String, Vec<u8>)>,
}

impl Changeset {
    pub fn new() -> Self {
        Changeset::default()
    }

    /// Stage `bytes` as the new content of `resource`.
    pub fn write(&mut self, resource: impl Into<String>, bytes: Vec<u8>) -> &mut Self {
        let resource = resource.into();
        if let Some(existing) = self.writes.iter_mut().find(|(name, _)| *name == resource) {
            existing.1 = bytes;
        } else {
            self.writes.push((resource, bytes));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn into_writes(self) -> Vec<(String, Vec<u8>)> {
        self.writes
    }
}
