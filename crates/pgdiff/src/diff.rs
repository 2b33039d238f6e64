//! Snapshot diffing.
//!
//! Two snapshots are reconciled identity by identity:
//!
//! - identities only in `after` are **added**,
//! - identities only in `before` are **removed**,
//! - identities in both whose attributes differ are **modified**, with a
//!   [`Delta`] listing exactly the attributes that changed.
//!
//! The differ knows nothing about individual kinds. Records of one kind share
//! one attribute schema, so comparing them attribute by attribute is enough;
//! everything kind-specific happened during extraction.
//!
//! Output is sorted by identity, so the same two snapshots always produce the
//! same change list regardless of how their records were collected.

use crate::{IdentityIndex, Snapshot};
use facet::Facet;
use indexmap::IndexMap;
use pgdiff_catalog::{Attributes, Identity, Kind, Value};
use std::fmt;

/// How an identity changed between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Facet)]
#[facet(rename_all = "lowercase")]
#[repr(u8)]
pub enum Classification {
    Added,
    Removed,
    Modified,
}

impl Classification {
    /// One-character marker used in rendered output.
    pub fn marker(self) -> char {
        match self {
            Classification::Added => '+',
            Classification::Removed => '-',
            Classification::Modified => '~',
        }
    }

    /// The classification of the same change seen from the other side.
    pub fn reversed(self) -> Self {
        match self {
            Classification::Added => Classification::Removed,
            Classification::Removed => Classification::Added,
            Classification::Modified => Classification::Modified,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Classification::Added => "added",
            Classification::Removed => "removed",
            Classification::Modified => "modified",
        })
    }
}

/// The attributes that differ between two versions of a record.
///
/// Entries keep the record's attribute order. Every entry holds a strictly
/// differing `(before, after)` pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delta(IndexMap<String, (Value, Value)>);

impl Delta {
    /// Compare two attribute maps.
    ///
    /// An attribute missing on one side compares as [`Value::Absent`].
    pub fn between(before: &Attributes, after: &Attributes) -> Self {
        let mut delta = IndexMap::new();
        for (name, old) in before.iter() {
            let new = after.get(name).unwrap_or(&Value::Absent);
            if old != new {
                delta.insert(name.to_string(), (old.clone(), new.clone()));
            }
        }
        for (name, new) in after.iter() {
            if !before.contains(name) && !new.is_absent() {
                delta.insert(name.to_string(), (Value::Absent, new.clone()));
            }
        }
        Self(delta)
    }

    pub fn get(&self, name: &str) -> Option<&(Value, Value)> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value, &Value)> {
        self.0
            .iter()
            .map(|(name, (before, after))| (name.as_str(), before, after))
    }

    /// Swap every pair.
    pub fn reversed(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(name, (before, after))| (name.clone(), (after.clone(), before.clone())))
                .collect(),
        )
    }
}

impl FromIterator<(String, (Value, Value))> for Delta {
    fn from_iter<I: IntoIterator<Item = (String, (Value, Value))>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One entry of a [`ChangeList`].
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub classification: Classification,
    pub identity: Identity,
    /// Attributes in the `before` snapshot; `None` for added objects.
    pub before: Option<Attributes>,
    /// Attributes in the `after` snapshot; `None` for removed objects.
    pub after: Option<Attributes>,
    /// Set for modified objects only.
    pub delta: Option<Delta>,
}

impl Change {
    pub fn added(identity: Identity, after: Attributes) -> Self {
        Self {
            classification: Classification::Added,
            identity,
            before: None,
            after: Some(after),
            delta: None,
        }
    }

    pub fn removed(identity: Identity, before: Attributes) -> Self {
        Self {
            classification: Classification::Removed,
            identity,
            before: Some(before),
            after: None,
            delta: None,
        }
    }

    /// A modification, or `None` if the two versions are identical.
    pub fn modified(identity: Identity, before: Attributes, after: Attributes) -> Option<Self> {
        let delta = Delta::between(&before, &after);
        if delta.is_empty() {
            return None;
        }
        Some(Self {
            classification: Classification::Modified,
            identity,
            before: Some(before),
            after: Some(after),
            delta: Some(delta),
        })
    }

    pub fn kind(&self) -> Kind {
        self.identity.kind
    }

    /// The same change seen from the other side: added and removed swap, as
    /// do the two attribute maps and every delta pair.
    pub fn reversed(&self) -> Self {
        Self {
            classification: self.classification.reversed(),
            identity: self.identity.clone(),
            before: self.after.clone(),
            after: self.before.clone(),
            delta: self.delta.as_ref().map(Delta::reversed),
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.classification.marker(), self.identity)
    }
}

/// Counts per classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.added + self.removed + self.modified
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} removed, {} modified",
            self.added, self.removed, self.modified
        )
    }
}

/// The result of a diff, ordered by identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeList {
    changes: Vec<Change>,
}

impl ChangeList {
    /// Build a change list, sorting by identity.
    pub fn new(mut changes: Vec<Change>) -> Self {
        changes.sort_by(|a, b| a.identity.cmp(&b.identity));
        Self { changes }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    pub fn as_slice(&self) -> &[Change] {
        &self.changes
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for change in &self.changes {
            match change.classification {
                Classification::Added => summary.added += 1,
                Classification::Removed => summary.removed += 1,
                Classification::Modified => summary.modified += 1,
            }
        }
        summary
    }

    /// Changes to objects of one kind.
    pub fn by_kind(&self, kind: Kind) -> impl Iterator<Item = &Change> {
        self.changes.iter().filter(move |c| c.kind() == kind)
    }

    /// Look up the change for one identity.
    pub fn get(&self, identity: &Identity) -> Option<&Change> {
        self.changes
            .binary_search_by(|c| c.identity.cmp(identity))
            .ok()
            .map(|i| &self.changes[i])
    }

    /// Every change reversed; equal to diffing the snapshots the other way.
    pub fn reversed(&self) -> Self {
        Self {
            changes: self.changes.iter().map(Change::reversed).collect(),
        }
    }
}

impl IntoIterator for ChangeList {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeList {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

impl fmt::Display for ChangeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            writeln!(f, "No changes detected.")?;
        } else {
            writeln!(f, "Changes detected:\n")?;
            for change in &self.changes {
                writeln!(f, "  {}", change)?;
                if let Some(delta) = &change.delta {
                    for (name, before, after) in delta.iter() {
                        writeln!(f, "      {}: {} -> {}", name, before, after)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Diff two identity indexes.
pub fn diff_indexes(before: &IdentityIndex, after: &IdentityIndex) -> ChangeList {
    let mut changes = Vec::new();

    for old in before.records() {
        match after.get(old.identity()) {
            None => changes.push(Change::removed(
                old.identity().clone(),
                old.attributes().clone(),
            )),
            Some(new) => {
                if let Some(change) = Change::modified(
                    old.identity().clone(),
                    old.attributes().clone(),
                    new.attributes().clone(),
                ) {
                    changes.push(change);
                }
            }
        }
    }

    for new in after.records() {
        if !before.contains(new.identity()) {
            changes.push(Change::added(
                new.identity().clone(),
                new.attributes().clone(),
            ));
        }
    }

    ChangeList::new(changes)
}

/// Diff two snapshots.
pub fn diff(before: &Snapshot, after: &Snapshot) -> ChangeList {
    let span = tracing::debug_span!(
        "pgdiff.diff",
        before = before.len(),
        after = after.len(),
        changes = tracing::field::Empty,
    );
    let _guard = span.enter();

    let changes = diff_indexes(before.index(), after.index());
    span.record("changes", changes.len());
    tracing::debug!(summary = %changes.summary(), "diff complete");
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgdiff_catalog::Record;

    fn make_column(name: &str, ty: &str, not_null: bool) -> Record {
        let (relation, _) = name.split_once('.').unwrap();
        Record::new(
            Kind::Column,
            "public",
            name,
            Attributes::new()
                .with("relation", relation)
                .with("type", ty)
                .with("length", -1i64)
                .with("dimensions", 0i64)
                .with("notNull", not_null)
                .with("hasDefault", false)
                .with("default", Value::Absent)
                .with("hasMissing", false)
                .with("missingValue", Value::Absent)
                .with("identity", "")
                .with("generated", "")
                .with("isLocal", true)
                .with("ancestors", 0i64)
                .with("collation", "\"default\"")
                .with("statistics", -1i64)
                .with("compression", "")
                .with("options", Value::Absent)
                .with("fdwOptions", Value::Absent)
                .with("acl", Value::Absent),
        )
        .unwrap()
    }

    fn make_namespace(name: &str, owner: &str) -> Record {
        Record::new(
            Kind::Namespace,
            "",
            name,
            Attributes::new().with("owner", owner).with("acl", Value::Absent),
        )
        .unwrap()
    }

    fn make_index(records: Vec<Record>) -> IdentityIndex {
        IdentityIndex::build(records).unwrap()
    }

    #[test]
    fn test_diff_empty_indexes() {
        let changes = diff_indexes(&IdentityIndex::default(), &IdentityIndex::default());
        assert!(changes.is_empty());
        assert_eq!(changes.to_string(), "No changes detected.\n");
    }

    #[test]
    fn test_diff_identical_is_empty() {
        let a = make_index(vec![make_column("test.column", "text", false)]);
        let b = make_index(vec![make_column("test.column", "text", false)]);
        assert!(diff_indexes(&a, &b).is_empty());
    }

    #[test]
    fn test_diff_add_and_remove() {
        let a = make_index(vec![make_namespace("old", "postgres")]);
        let b = make_index(vec![make_namespace("new", "postgres")]);
        let changes = diff_indexes(&a, &b);

        assert_eq!(changes.len(), 2);
        let classes: Vec<_> = changes.iter().map(|c| c.classification).collect();
        assert_eq!(classes, [Classification::Added, Classification::Removed]);

        let added = &changes.as_slice()[0];
        assert_eq!(added.identity.name, "new");
        assert!(added.before.is_none());
        assert!(added.after.is_some());
        assert!(added.delta.is_none());
    }

    #[test]
    fn test_diff_modified_has_minimal_delta() {
        let a = make_index(vec![make_column("test.column", "text", false)]);
        let b = make_index(vec![make_column("test.column", "character varying", false)]);
        let changes = diff_indexes(&a, &b);

        assert_eq!(changes.len(), 1);
        let change = &changes.as_slice()[0];
        assert_eq!(change.classification, Classification::Modified);
        let delta = change.delta.as_ref().unwrap();
        assert_eq!(delta.len(), 1);
        assert_eq!(
            delta.get("type"),
            Some(&(Value::from("text"), Value::from("character varying")))
        );
    }

    #[test]
    fn test_output_is_sorted_by_kind_then_namespace_then_name() {
        let a = make_index(vec![]);
        let b = make_index(vec![
            make_namespace("zeta", "postgres"),
            make_column("b.x", "text", false),
            make_column("a.x", "text", false),
            make_namespace("alpha", "postgres"),
        ]);
        let names: Vec<_> = diff_indexes(&a, &b)
            .iter()
            .map(|c| c.identity.to_string())
            .collect();
        assert_eq!(
            names,
            [
                "column public.a.x",
                "column public.b.x",
                "namespace alpha",
                "namespace zeta",
            ]
        );
    }

    #[test]
    fn test_reversed_matches_diff_the_other_way() {
        let a = make_index(vec![
            make_namespace("old", "postgres"),
            make_column("test.column", "text", false),
        ]);
        let b = make_index(vec![
            make_namespace("new", "postgres"),
            make_column("test.column", "text", true),
        ]);
        assert_eq!(diff_indexes(&a, &b).reversed(), diff_indexes(&b, &a));
    }

    #[test]
    fn test_summary_and_by_kind() {
        let a = make_index(vec![
            make_namespace("old", "postgres"),
            make_column("test.column", "text", false),
        ]);
        let b = make_index(vec![
            make_namespace("new", "postgres"),
            make_column("test.column", "text", true),
        ]);
        let changes = diff_indexes(&a, &b);
        let summary = changes.summary();
        assert_eq!(summary.added, 1);
        assert_eq!(summary.removed, 1);
        assert_eq!(summary.modified, 1);
        assert_eq!(summary.total(), changes.len());
        assert_eq!(summary.to_string(), "1 added, 1 removed, 1 modified");
        assert_eq!(changes.by_kind(Kind::Namespace).count(), 2);
        assert_eq!(changes.by_kind(Kind::Relation).count(), 0);

        let column = Identity::new(Kind::Column, "public", "test.column");
        assert_eq!(
            changes.get(&column).map(|c| c.classification),
            Some(Classification::Modified)
        );
    }

    #[test]
    fn test_delta_treats_missing_attribute_as_absent() {
        let before = Attributes::new().with("a", 1i64).with("b", Value::Absent);
        let after = Attributes::new().with("a", 1i64);
        assert!(Delta::between(&before, &after).is_empty());

        let after = Attributes::new().with("a", 1i64).with("c", "x");
        let delta = Delta::between(&before, &after);
        assert_eq!(delta.names().collect::<Vec<_>>(), ["c"]);
    }

    #[test]
    fn test_display() {
        let a = make_index(vec![make_column("test.column", "text", false)]);
        let b = make_index(vec![
            make_column("test.column", "text", true),
            make_namespace("app", "postgres"),
        ]);
        insta::assert_snapshot!(diff_indexes(&a, &b).to_string(), @r#"
        Changes detected:

          ~ column public.test.column
              notNull: false -> true
          + namespace app
        "#);
    }
}
