use crate::{IdentityIndex, Result, annotate};
use pgdiff_catalog::{Identity, Record};

/// A complete, immutable set of records captured at one point in time.
///
/// Identities are unique within a snapshot; building one from colliding
/// records fails with [`Error::DuplicateIdentity`](crate::Error::DuplicateIdentity).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    index: IdentityIndex,
}

impl Snapshot {
    pub fn new(records: impl IntoIterator<Item = Record>) -> Result<Self> {
        Ok(Self {
            index: IdentityIndex::build(records)?,
        })
    }

    /// The snapshot of a database with nothing in it.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_index(index: IdentityIndex) -> Self {
        Self { index }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Records in identity order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.index.records()
    }

    pub fn get(&self, identity: &Identity) -> Option<&Record> {
        self.index.get(identity)
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.index.contains(identity)
    }

    pub fn index(&self) -> &IdentityIndex {
        &self.index
    }

    /// Description records attached to `identity`.
    pub fn comments_for(&self, identity: &Identity) -> Vec<&Record> {
        self.index
            .records()
            .filter(|record| annotate::target_of(record).as_ref() == Some(identity))
            .collect()
    }
}
