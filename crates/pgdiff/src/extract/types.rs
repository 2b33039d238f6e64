//! Types, sequences and collations.

use super::CatalogObject;
use crate::{RawRow, Ref, Result};
use pgdiff_catalog::{Attributes, Kind, Value};

/// A type: base, composite, domain, enum, pseudo, range or multirange.
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub namespace: String,
    pub name: String,
    /// `typtype`: `b`, `c`, `d`, `e`, `p`, `r` or `m`.
    pub kind: String,
    pub category: String,
    pub is_preferred: bool,
    pub is_defined: bool,
    pub is_by_value: bool,
    pub length: i64,
    pub align: String,
    pub storage: String,
    pub delimiter: String,
    pub owner: Ref,
    /// The relation behind a composite type.
    pub relation: Ref,
    /// The array type whose element is this type.
    pub array: Ref,
    /// Underlying type of a domain.
    pub base_type: Ref,
    pub collation: Ref,
    pub subscript: Ref,
    pub input_function: Ref,
    pub output_function: Ref,
    pub receive_function: Ref,
    pub send_function: Ref,
    pub modifier_input_function: Ref,
    pub modifier_output_function: Ref,
    pub analyze_function: Ref,
    pub not_null: bool,
    pub type_mod: i64,
    pub number_of_dimensions: i64,
    pub default: Option<String>,
    /// Enum labels in sort order; only set for enums.
    pub enum_labels: Option<Vec<String>>,
    pub acl: Option<Vec<String>>,
}

impl CatalogObject for Type {
    const KIND: Kind = Kind::Type;

    fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            namespace: row.text("namespace")?,
            name: row.text("name")?,
            kind: row.text("type")?,
            category: row.text("category")?,
            is_preferred: row.bool("isPreferred")?,
            is_defined: row.bool("isDefined")?,
            is_by_value: row.bool("isByValue")?,
            length: row.int("length")?,
            align: row.text("align")?,
            storage: row.text("storage")?,
            delimiter: row.text("delimiter")?,
            owner: row.reference("owner")?,
            relation: row.reference("relation")?,
            array: row.reference("array")?,
            base_type: row.reference("baseType")?,
            collation: row.reference("collation")?,
            subscript: row.reference("subscript")?,
            input_function: row.reference("inputFunction")?,
            output_function: row.reference("outputFunction")?,
            receive_function: row.reference("receiveFunction")?,
            send_function: row.reference("sendFunction")?,
            modifier_input_function: row.reference("modifierInputFunction")?,
            modifier_output_function: row.reference("modifierOutputFunction")?,
            analyze_function: row.reference("analyzeFunction")?,
            not_null: row.bool("notNull")?,
            type_mod: row.int("typeMod")?,
            number_of_dimensions: row.int("numberOfDimensions")?,
            default: row.opt_text("default")?,
            enum_labels: row.opt_list("enumLabels")?,
            acl: row.opt_list("acl")?,
        })
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("type", &self.kind)
            .with("category", &self.category)
            .with("isPreferred", self.is_preferred)
            .with("isDefined", self.is_defined)
            .with("isByValue", self.is_by_value)
            .with("length", self.length)
            .with("align", &self.align)
            .with("storage", &self.storage)
            .with("delimiter", &self.delimiter)
            .with("owner", &self.owner)
            .with("relation", &self.relation)
            .with("array", &self.array)
            .with("baseType", &self.base_type)
            .with("collation", &self.collation)
            .with("subscript", &self.subscript)
            .with("inputFunction", &self.input_function)
            .with("outputFunction", &self.output_function)
            .with("receiveFunction", &self.receive_function)
            .with("sendFunction", &self.send_function)
            .with("modifierInputFunction", &self.modifier_input_function)
            .with("modifierOutputFunction", &self.modifier_output_function)
            .with("analyzeFunction", &self.analyze_function)
            .with("notNull", self.not_null)
            .with("typeMod", self.type_mod)
            .with("numberOfDimensions", self.number_of_dimensions)
            .with("default", self.default.clone())
            .with("enumLabels", self.enum_labels.clone().map(Value::list))
            .with("acl", self.acl.clone().map(Value::set))
    }
}

/// Sequence parameters. The sequence's relation is a separate [`Relation`](super::Relation) record.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub namespace: String,
    pub name: String,
    pub data_type: Ref,
    pub start: i64,
    pub increment: i64,
    pub max_value: i64,
    pub min_value: i64,
    pub cache_value: i64,
    pub is_cycled: bool,
}

impl CatalogObject for Sequence {
    const KIND: Kind = Kind::Sequence;

    fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            namespace: row.text("namespace")?,
            name: row.text("name")?,
            data_type: row.reference("type")?,
            start: row.int("start")?,
            increment: row.int("increment")?,
            max_value: row.int("maxValue")?,
            min_value: row.int("minValue")?,
            cache_value: row.int("cacheValue")?,
            is_cycled: row.bool("isCycled")?,
        })
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("type", &self.data_type)
            .with("start", self.start)
            .with("increment", self.increment)
            .with("maxValue", self.max_value)
            .with("minValue", self.min_value)
            .with("cacheValue", self.cache_value)
            .with("isCycled", self.is_cycled)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collation {
    pub namespace: String,
    pub name: String,
    pub owner: Ref,
    /// `d` default, `c` libc, `i` icu.
    pub provider: String,
    pub deterministic: bool,
    /// Encoding name, or `-1` for "any encoding".
    pub encoding: String,
    pub collate: Option<String>,
    pub ctype: Option<String>,
    pub locale: Option<String>,
    pub rules: Option<String>,
    pub version: Option<String>,
}

impl CatalogObject for Collation {
    const KIND: Kind = Kind::Collation;

    fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            namespace: row.text("namespace")?,
            name: row.text("name")?,
            owner: row.reference("owner")?,
            provider: row.text("provider")?,
            deterministic: row.bool("deterministic")?,
            encoding: row.text("encoding")?,
            collate: row.opt_text("collate")?,
            ctype: row.opt_text("type")?,
            locale: row.opt_text("locale")?,
            rules: row.opt_text("rules")?,
            version: row.opt_text("version")?,
        })
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("owner", &self.owner)
            .with("provider", &self.provider)
            .with("deterministic", self.deterministic)
            .with("encoding", &self.encoding)
            .with("collate", self.collate.clone())
            .with("type", self.ctype.clone())
            .with("locale", self.locale.clone())
            .with("rules", self.rules.clone())
            .with("version", self.version.clone())
    }
}
