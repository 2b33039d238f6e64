//! Raw catalog rows, as handed over by the data-access layer.
//!
//! A [`RawRow`] is loosely typed: a catalog name plus a map of field values.
//! Every foreign reference in it is expected to be resolved to a name
//! already. The typed accessors here are the only place raw values are
//! interpreted; they fail with [`Error::MalformedAttribute`] instead of
//! guessing.

use crate::{Error, Result};
use indexmap::IndexMap;
use pgdiff_catalog::Value;
use std::fmt;

/// Rendering of a reference to oid 0 ("no such object").
pub const NOT_APPLICABLE: &str = "-";

/// A loosely typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Array(Vec<RawValue>),
}

impl RawValue {
    fn type_name(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "bool",
            RawValue::Int(_) => "int",
            RawValue::Float(_) => "float",
            RawValue::Text(_) => "text",
            RawValue::Array(_) => "array",
        }
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Int(i)
    }
}

impl From<i32> for RawValue {
    fn from(i: i32) -> Self {
        RawValue::Int(i64::from(i))
    }
}

impl From<f64> for RawValue {
    fn from(x: f64) -> Self {
        RawValue::Float(x)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Null, Into::into)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(items: Vec<T>) -> Self {
        RawValue::Array(items.into_iter().map(Into::into).collect())
    }
}

/// A resolved reference to another catalog object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ref {
    Named(String),
    /// The reference points at nothing (oid 0).
    NotApplicable,
}

impl Ref {
    pub fn name(&self) -> Option<&str> {
        match self {
            Ref::Named(name) => Some(name),
            Ref::NotApplicable => None,
        }
    }

    /// The referenced name, or `-` when there is none.
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or(NOT_APPLICABLE)
    }
}

impl From<&Ref> for Value {
    fn from(r: &Ref) -> Self {
        match r {
            Ref::Named(name) => Value::Text(name.clone()),
            Ref::NotApplicable => Value::NotApplicable,
        }
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One row read from a system catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    catalog: String,
    fields: IndexMap<String, RawValue>,
}

impl RawRow {
    pub fn new(catalog: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Name of the catalog the row was read from (`pg_class`, ...).
    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn malformed(&self, field: &str, reason: impl Into<String>) -> Error {
        Error::MalformedAttribute {
            catalog: self.catalog.clone(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    fn field(&self, field: &str) -> Result<&RawValue> {
        self.fields
            .get(field)
            .ok_or_else(|| self.malformed(field, "field is missing"))
    }

    fn wrong_type(&self, field: &str, expected: &str, found: &RawValue) -> Error {
        self.malformed(
            field,
            format!("expected {expected}, found {}", found.type_name()),
        )
    }

    /// A required text field.
    pub fn text(&self, field: &str) -> Result<String> {
        match self.field(field)? {
            RawValue::Text(s) => Ok(s.clone()),
            other => Err(self.wrong_type(field, "text", other)),
        }
    }

    /// A nullable text field.
    pub fn opt_text(&self, field: &str) -> Result<Option<String>> {
        match self.field(field)? {
            RawValue::Null => Ok(None),
            RawValue::Text(s) => Ok(Some(s.clone())),
            other => Err(self.wrong_type(field, "text or null", other)),
        }
    }

    /// A resolved foreign reference.
    ///
    /// `-` means the reference points at nothing. `NULL` means the
    /// data-access layer could not resolve it, which is an error: emitting
    /// the record anyway would hide whatever the reference pointed at.
    pub fn reference(&self, field: &str) -> Result<Ref> {
        match self.field(field)? {
            RawValue::Text(s) if s == NOT_APPLICABLE => Ok(Ref::NotApplicable),
            RawValue::Text(s) => Ok(Ref::Named(s.clone())),
            RawValue::Null => Err(self.malformed(field, "unresolved reference")),
            other => Err(self.wrong_type(field, "reference name", other)),
        }
    }

    /// A foreign reference that may legitimately be empty.
    ///
    /// Some catalog columns use `NULL` rather than oid 0 for "none"
    /// (`reltablespace` of a table in the default tablespace, the access
    /// method of a view). For those, `NULL` is a value and not a failed lookup.
    pub fn opt_reference(&self, field: &str) -> Result<Option<Ref>> {
        match self.field(field)? {
            RawValue::Null => Ok(None),
            _ => self.reference(field).map(Some),
        }
    }

    pub fn bool(&self, field: &str) -> Result<bool> {
        match self.field(field)? {
            RawValue::Bool(b) => Ok(*b),
            other => Err(self.wrong_type(field, "bool", other)),
        }
    }

    pub fn int(&self, field: &str) -> Result<i64> {
        match self.field(field)? {
            RawValue::Int(i) => Ok(*i),
            other => Err(self.wrong_type(field, "int", other)),
        }
    }

    /// A float field. Integral values are accepted as well.
    pub fn float(&self, field: &str) -> Result<f64> {
        match self.field(field)? {
            RawValue::Float(x) => Ok(*x),
            RawValue::Int(i) => Ok(*i as f64),
            other => Err(self.wrong_type(field, "float", other)),
        }
    }

    /// A required array of names.
    pub fn list(&self, field: &str) -> Result<Vec<String>> {
        match self.field(field)? {
            RawValue::Array(items) => items
                .iter()
                .map(|item| match item {
                    RawValue::Text(s) => Ok(s.clone()),
                    other => Err(self.wrong_type(field, "array of text", other)),
                })
                .collect(),
            other => Err(self.wrong_type(field, "array", other)),
        }
    }

    /// A nullable array of names.
    pub fn opt_list(&self, field: &str) -> Result<Option<Vec<String>>> {
        match self.field(field)? {
            RawValue::Null => Ok(None),
            _ => self.list(field).map(Some),
        }
    }
}

/// Where raw catalog rows come from.
///
/// Implementations run the catalog queries; the engine only consumes the
/// rows. In-memory row collections implement this trait directly.
pub trait CatalogSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read a full, consistent set of catalog rows.
    fn rows(&self) -> Result<Vec<RawRow>, Self::Error>;
}

impl CatalogSource for [RawRow] {
    type Error = std::convert::Infallible;

    fn rows(&self) -> Result<Vec<RawRow>, Self::Error> {
        Ok(self.to_vec())
    }
}

impl CatalogSource for Vec<RawRow> {
    type Error = std::convert::Infallible;

    fn rows(&self) -> Result<Vec<RawRow>, Self::Error> {
        Ok(self.clone())
    }
}
