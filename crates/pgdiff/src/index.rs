//! Identity index: records keyed by `(kind, namespace, name)`.

use crate::{Error, Result};
use pgdiff_catalog::{Identity, Record};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Records of one snapshot, keyed and ordered by identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityIndex {
    records: BTreeMap<Identity, Record>,
}

impl IdentityIndex {
    /// Index `records`, failing on the first identity seen twice.
    ///
    /// Collisions are never resolved by picking a winner; the error carries
    /// both records.
    pub fn build(records: impl IntoIterator<Item = Record>) -> Result<Self> {
        let mut index = BTreeMap::new();
        for record in records {
            match index.entry(record.identity().clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
                Entry::Occupied(slot) => {
                    let (identity, first) = slot.remove_entry();
                    tracing::warn!(%identity, "duplicate identity in snapshot");
                    return Err(Error::DuplicateIdentity {
                        identity,
                        first: Box::new(first),
                        second: Box::new(record),
                    });
                }
            }
        }
        Ok(Self { records: index })
    }

    pub fn get(&self, identity: &Identity) -> Option<&Record> {
        self.records.get(identity)
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.records.contains_key(identity)
    }

    /// All identities, in `(kind, namespace, name)` order.
    pub fn identities(&self) -> impl Iterator<Item = &Identity> {
        self.records.keys()
    }

    /// All records, in identity order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
