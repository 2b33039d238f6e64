//! Comments (`COMMENT ON ...`).
//!
//! A comment has no key of its own, so its identity name embeds the comment
//! text: editing a comment shows up as one description removed and another
//! added.

use super::CatalogObject;
use crate::{RawRow, Result};
use pgdiff_catalog::{Attributes, Identity, Kind, Record};

/// Column comments target their relation (with `column` set), so `column`
/// itself is not a valid target; neither are comments or aggregate details.
fn accepts_comments(kind: Kind) -> bool {
    !matches!(kind, Kind::Column | Kind::Description | Kind::AggregateDetail)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    /// Namespace of the described object; for a schema comment, the schema.
    pub namespace: String,
    /// Kind of the described object.
    pub target: Kind,
    /// Identity name of the described object (a relation for column comments).
    pub object: String,
    /// Set for column comments.
    pub column: Option<String>,
    pub description: String,
}

impl Description {
    /// The identity of the object this comment is attached to.
    pub fn target_identity(&self) -> Identity {
        if let Some(column) = &self.column {
            return Identity::new(
                Kind::Column,
                self.namespace.clone(),
                format!("{}.{}", self.object, column),
            );
        }
        let namespace = if self.target.has_namespace() {
            self.namespace.clone()
        } else {
            String::new()
        };
        Identity::new(self.target, namespace, self.object.clone())
    }

    /// Rebuild a description from a record of kind [`Kind::Description`].
    pub fn from_record(record: &Record) -> Option<Self> {
        if record.kind() != Kind::Description {
            return None;
        }
        Some(Self {
            namespace: record.namespace().to_string(),
            target: Kind::from_tag(record.get("target")?.as_str()?)?,
            object: record.get("object")?.as_str()?.to_string(),
            column: record.get("column")?.as_str().map(str::to_string),
            description: record.get("description")?.as_str()?.to_string(),
        })
    }
}

impl CatalogObject for Description {
    const KIND: Kind = Kind::Description;

    fn from_row(row: &RawRow) -> Result<Self> {
        let tag = row.text("target")?;
        let target = Kind::from_tag(&tag)
            .ok_or_else(|| row.malformed("target", format!("unknown object kind `{tag}`")))?;
        if !accepts_comments(target) {
            return Err(row.malformed("target", format!("a {target} cannot be commented on")));
        }
        let column = row.opt_text("column")?;
        if column.is_some() && target != Kind::Relation {
            return Err(row.malformed("column", format!("column comment on a {target}")));
        }
        Ok(Self {
            namespace: row.text("namespace")?,
            target,
            object: row.text("object")?,
            column,
            description: row.text("description")?,
        })
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> String {
        match (self.target, &self.column) {
            (Kind::Relation, Some(column)) => {
                format!("{}.{} {}", self.object, column, self.description)
            }
            (Kind::Relation, None) => format!("{} {}", self.object, self.description),
            (kind, _) => format!("{} {} {}", kind, self.object, self.description),
        }
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("target", self.target.tag())
            .with("object", &self.object)
            .with("column", self.column.clone())
            .with("description", &self.description)
    }
}
