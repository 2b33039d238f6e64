//! Comment association.
//!
//! Descriptions are ordinary records as far as the differ is concerned. This
//! module is what ties them back to the objects they describe.

use crate::extract::Description;
use crate::{Error, IdentityIndex, Result};
use pgdiff_catalog::{Identity, Kind, Record};
use std::collections::BTreeMap;

/// The object a description record is attached to, or `None` for records of
/// any other kind.
pub fn target_of(record: &Record) -> Option<Identity> {
    Description::from_record(record).map(|description| description.target_identity())
}

/// Group the descriptions of an index by target.
pub fn attach(index: &IdentityIndex) -> BTreeMap<Identity, Vec<&Record>> {
    let mut by_target: BTreeMap<Identity, Vec<&Record>> = BTreeMap::new();
    for record in index.records().filter(|r| r.kind() == Kind::Description) {
        if let Some(target) = target_of(record) {
            by_target.entry(target).or_default().push(record);
        }
    }
    by_target
}

/// Descriptions whose target is not part of the index.
pub fn dangling(index: &IdentityIndex) -> Vec<(&Record, Identity)> {
    attach(index)
        .into_iter()
        .filter(|(target, _)| !index.contains(target))
        .flat_map(|(target, records)| records.into_iter().map(move |r| (r, target.clone())))
        .collect()
}

/// Fail on the first dangling comment unless `allow_dangling` is set.
pub(crate) fn verify_targets(index: &IdentityIndex, allow_dangling: bool) -> Result<()> {
    for (record, target) in dangling(index) {
        if allow_dangling {
            tracing::debug!(comment = %record.identity(), %target, "keeping dangling comment");
            continue;
        }
        tracing::warn!(
            comment = %record.identity(),
            %target,
            "comment target missing from snapshot"
        );
        return Err(Error::MalformedAttribute {
            catalog: Kind::Description.catalog().to_string(),
            field: "object".to_string(),
            reason: format!("comment target {target} is not in the snapshot"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::CatalogObject;
    use pgdiff_catalog::{AttrType, Attributes, Value};

    fn make_comment(object: &str, column: Option<&str>, text: &str) -> Record {
        Description {
            namespace: "public".to_string(),
            target: Kind::Relation,
            object: object.to_string(),
            column: column.map(str::to_string),
            description: text.to_string(),
        }
        .to_record()
        .unwrap()
    }

    fn make_relation_stub(name: &str) -> Record {
        let attributes: Attributes = Kind::Relation
            .schema()
            .iter()
            .map(|spec| {
                let value = match spec.ty {
                    AttrType::Bool => Value::Bool(false),
                    AttrType::Int => Value::Int(0),
                    AttrType::Float => Value::Float(0.0),
                    AttrType::Text | AttrType::Reference => Value::from("x"),
                    AttrType::List => Value::list(Vec::<String>::new()),
                    AttrType::Set => Value::set(Vec::<String>::new()),
                };
                (spec.name, value)
            })
            .collect();
        Record::new(Kind::Relation, "public", name, attributes).unwrap()
    }

    #[test]
    fn test_attach_groups_by_target() {
        let index = IdentityIndex::build([
            make_relation_stub("test"),
            make_comment("test", None, "a table"),
            make_comment("test", Some("column"), "a column"),
        ])
        .unwrap();
        let attached = attach(&index);
        assert_eq!(attached.len(), 2);
        let table = Identity::new(Kind::Relation, "public", "test");
        assert_eq!(attached[&table].len(), 1);
        assert_eq!(attached[&table][0].name(), "test a table");
    }

    #[test]
    fn test_dangling_comment_fails() {
        let index = IdentityIndex::build([
            make_relation_stub("test"),
            make_comment("gone", None, "a table"),
        ])
        .unwrap();
        assert_eq!(dangling(&index).len(), 1);
        let err = verify_targets(&index, false).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedAttribute { ref catalog, ref field, .. }
                if catalog == "pg_description" && field == "object"
        ));
        assert!(verify_targets(&index, true).is_ok());
    }

    #[test]
    fn test_target_of_ignores_other_kinds() {
        assert_eq!(target_of(&make_relation_stub("test")), None);
    }
}
