//! Canonical catalog records for pgdiff.
//!
//! Every object read out of a Postgres catalog is normalized into a [`Record`]:
//! a [`Kind`] tag, a namespace, a human-readable name, and a flat
//! [`Attributes`] map. The attribute names and types are fixed per kind (see
//! [`Kind::schema`]), which is what lets the differ compare any two records
//! attribute by attribute without knowing anything about tables or functions.
//!
//! Foreign references are never stored as oids. An owner is stored as the
//! owner's role name, a column type as the type's name, and so on.

use facet::Facet;
use indexmap::IndexMap;
use std::fmt;

mod schema;
mod value;

pub use schema::{AttrSpec, AttrType};
pub use value::Value;

#[cfg(test)]
mod tests;

/// The category of a catalog object.
///
/// Variants are declared in the lexicographic order of their tags, so the
/// derived `Ord` is the order changes are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Facet)]
#[facet(rename_all = "kebab-case")]
#[repr(u8)]
pub enum Kind {
    /// Aggregate-specific details (`pg_aggregate`) of an aggregate function.
    AggregateDetail,
    /// A type cast (`pg_cast`).
    Cast,
    /// A collation (`pg_collation`).
    Collation,
    /// A table or view column (`pg_attribute`).
    Column,
    /// A table or domain constraint (`pg_constraint`).
    Constraint,
    /// A database (`pg_database`).
    Database,
    /// A comment attached to another object (`pg_description`).
    Description,
    /// An event trigger (`pg_event_trigger`).
    EventTrigger,
    /// An installed extension (`pg_extension`).
    Extension,
    /// A function, procedure, aggregate or window function (`pg_proc`).
    Function,
    /// A schema (`pg_namespace`).
    Namespace,
    /// An operator (`pg_operator`).
    Operator,
    /// A row-level security policy (`pg_policy`).
    Policy,
    /// Publication membership of a table or schema (`pg_publication`).
    Publication,
    /// A table, view, materialized view or foreign table (`pg_class`).
    Relation,
    /// A rewrite rule (`pg_rewrite`).
    RewriteRule,
    /// A role (`pg_authid`).
    Role,
    /// A sequence (`pg_sequence`).
    Sequence,
    /// A table trigger (`pg_trigger`).
    Trigger,
    /// A type, including enums, composites and domains (`pg_type`).
    Type,
}

impl Kind {
    /// All kinds, in tag order.
    pub const ALL: [Kind; 20] = [
        Kind::AggregateDetail,
        Kind::Cast,
        Kind::Collation,
        Kind::Column,
        Kind::Constraint,
        Kind::Database,
        Kind::Description,
        Kind::EventTrigger,
        Kind::Extension,
        Kind::Function,
        Kind::Namespace,
        Kind::Operator,
        Kind::Policy,
        Kind::Publication,
        Kind::Relation,
        Kind::RewriteRule,
        Kind::Role,
        Kind::Sequence,
        Kind::Trigger,
        Kind::Type,
    ];

    /// The tag used on the wire and in rendered output.
    pub fn tag(self) -> &'static str {
        match self {
            Kind::AggregateDetail => "aggregate-detail",
            Kind::Cast => "cast",
            Kind::Collation => "collation",
            Kind::Column => "column",
            Kind::Constraint => "constraint",
            Kind::Database => "database",
            Kind::Description => "description",
            Kind::EventTrigger => "event-trigger",
            Kind::Extension => "extension",
            Kind::Function => "function",
            Kind::Namespace => "namespace",
            Kind::Operator => "operator",
            Kind::Policy => "policy",
            Kind::Publication => "publication",
            Kind::Relation => "relation",
            Kind::RewriteRule => "rewrite-rule",
            Kind::Role => "role",
            Kind::Sequence => "sequence",
            Kind::Trigger => "trigger",
            Kind::Type => "type",
        }
    }

    /// The system catalog rows of this kind are read from.
    pub fn catalog(self) -> &'static str {
        match self {
            Kind::AggregateDetail => "pg_aggregate",
            Kind::Cast => "pg_cast",
            Kind::Collation => "pg_collation",
            Kind::Column => "pg_attribute",
            Kind::Constraint => "pg_constraint",
            Kind::Database => "pg_database",
            Kind::Description => "pg_description",
            Kind::EventTrigger => "pg_event_trigger",
            Kind::Extension => "pg_extension",
            Kind::Function => "pg_proc",
            Kind::Namespace => "pg_namespace",
            Kind::Operator => "pg_operator",
            Kind::Policy => "pg_policy",
            Kind::Publication => "pg_publication",
            Kind::Relation => "pg_class",
            Kind::RewriteRule => "pg_rewrite",
            Kind::Role => "pg_authid",
            Kind::Sequence => "pg_sequence",
            Kind::Trigger => "pg_trigger",
            Kind::Type => "pg_type",
        }
    }

    /// Look up a kind by its tag.
    pub fn from_tag(tag: &str) -> Option<Kind> {
        Kind::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// Look up a kind by the catalog its rows come from.
    pub fn from_catalog(catalog: &str) -> Option<Kind> {
        Kind::ALL.into_iter().find(|k| k.catalog() == catalog)
    }

    /// Whether objects of this kind belong to a schema.
    ///
    /// Publications are schema-scoped except for `FOR ALL TABLES`.
    pub fn has_namespace(self) -> bool {
        !matches!(
            self,
            Kind::Cast | Kind::Database | Kind::EventTrigger | Kind::Namespace | Kind::Role
        )
    }

    /// The fixed attribute schema shared by every record of this kind.
    pub fn schema(self) -> &'static [AttrSpec] {
        schema::attributes(self)
    }

    /// Look up one attribute of this kind's schema.
    pub fn attribute(self, name: &str) -> Option<&'static AttrSpec> {
        self.schema().iter().find(|spec| spec.name == name)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Identifies one object within a snapshot.
///
/// Field order matters: the derived `Ord` sorts by kind, then namespace, then
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity {
    /// Object category.
    pub kind: Kind,
    /// Owning schema, empty for objects that live outside any schema.
    pub namespace: String,
    /// Kind-specific display name (`table.column`, `f(int4): text`, ...).
    pub name: String,
}

impl Identity {
    pub fn new(kind: Kind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{} {}", self.kind, self.name)
        } else {
            write!(f, "{} {}.{}", self.kind, self.namespace, self.name)
        }
    }
}

/// Ordered attribute map of a record.
///
/// Equality ignores insertion order; attribute order is only used for
/// rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(IndexMap<String, Value>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
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

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.shift_remove(name)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One normalized catalog object.
///
/// A record can only be built through [`Record::new`], which checks the
/// attributes against the kind's schema, so every record of a kind carries
/// the same attribute names in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    identity: Identity,
    attributes: Attributes,
}

impl Record {
    /// Build a record, validating `attributes` against `kind`'s schema.
    ///
    /// The stored attributes are reordered to schema order.
    pub fn new(
        kind: Kind,
        namespace: impl Into<String>,
        name: impl Into<String>,
        mut attributes: Attributes,
    ) -> Result<Self, SchemaViolation> {
        let mut ordered = Attributes::new();
        for spec in kind.schema() {
            let value = attributes
                .remove(spec.name)
                .ok_or_else(|| SchemaViolation::MissingAttribute {
                    kind,
                    attribute: spec.name.to_string(),
                })?;
            spec.check(kind, &value)?;
            ordered.insert(spec.name, value);
        }

        if let Some(extra) = attributes.names().next() {
            return Err(SchemaViolation::UnknownAttribute {
                kind,
                attribute: extra.to_string(),
            });
        }

        Ok(Self {
            identity: Identity::new(kind, namespace, name),
            attributes: ordered,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn kind(&self) -> Kind {
        self.identity.kind
    }

    pub fn namespace(&self) -> &str {
        &self.identity.namespace
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Shorthand for `self.attributes().get(name)`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Split the record into its identity and attributes.
    pub fn into_parts(self) -> (Identity, Attributes) {
        (self.identity, self.attributes)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity)
    }
}

/// A record does not match its kind's attribute schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("{kind} record is missing attribute `{attribute}`")]
    MissingAttribute { kind: Kind, attribute: String },

    #[error("{kind} records have no attribute `{attribute}`")]
    UnknownAttribute { kind: Kind, attribute: String },

    #[error("{kind} attribute `{attribute}` expects {expected}, found {found}")]
    TypeMismatch {
        kind: Kind,
        attribute: String,
        expected: AttrType,
        found: &'static str,
    },

    #[error("{kind} attribute `{attribute}` cannot be {sentinel}")]
    IllegalSentinel {
        kind: Kind,
        attribute: String,
        sentinel: &'static str,
    },
}

impl SchemaViolation {
    /// The attribute the violation is about.
    pub fn attribute(&self) -> &str {
        match self {
            SchemaViolation::MissingAttribute { attribute, .. }
            | SchemaViolation::UnknownAttribute { attribute, .. }
            | SchemaViolation::TypeMismatch { attribute, .. }
            | SchemaViolation::IllegalSentinel { attribute, .. } => attribute,
        }
    }
}
