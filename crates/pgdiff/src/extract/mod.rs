//! Kind extractors - turn raw catalog rows into canonical records.
//!
//! Each kind has a typed struct implementing [`CatalogObject`]. The struct is
//! where all kind-specific knowledge lives: which raw fields are read, how the
//! identity name is built, and which attributes the record carries. The
//! differ never looks past the [`Record`] these produce.
//!
//! Rows are dispatched on their catalog name. A row from a catalog with no
//! extractor fails with [`Error::UnrecognizedRow`]; a row whose fields cannot
//! be normalized fails with [`Error::MalformedAttribute`]. Neither produces a
//! partial record.

use crate::{Error, RawRow, Result};
use pgdiff_catalog::{Attributes, Kind, Record};

mod cluster;
mod description;
mod relation;
mod routine;
mod types;

pub use cluster::{
    Database, EventTrigger, Extension, Namespace, Publication, PublicationTarget, Role,
};
pub use description::Description;
pub use relation::{Column, Constraint, Policy, Relation, RewriteRule, Trigger};
pub use routine::{AggregateDetail, Cast, Function, Operator};
pub use types::{Collation, Sequence, Type};

/// A catalog object kind with a typed representation.
pub trait CatalogObject: Sized {
    /// The kind every object of this type normalizes to.
    const KIND: Kind;

    /// Read the object from a raw row of [`Kind::catalog`].
    fn from_row(row: &RawRow) -> Result<Self>;

    /// Owning schema, or `""`.
    fn namespace(&self) -> &str;

    /// Identity name, unique among objects of this kind in one namespace.
    fn name(&self) -> String;

    /// The kind-erased attribute view.
    fn attributes(&self) -> Attributes;

    /// Normalize into a canonical record.
    fn to_record(&self) -> Result<Record> {
        Record::new(Self::KIND, self.namespace(), self.name(), self.attributes()).map_err(
            |violation| Error::MalformedAttribute {
                catalog: Self::KIND.catalog().to_string(),
                field: violation.attribute().to_string(),
                reason: violation.to_string(),
            },
        )
    }
}

macro_rules! objects {
    ($($kind:ident => $ty:ty),* $(,)?) => {
        /// A typed catalog object, one variant per [`Kind`].
        #[derive(Debug, Clone, PartialEq)]
        pub enum Object {
            $($kind($ty),)*
        }

        impl Object {
            /// Dispatch a raw row to the extractor for its catalog.
            pub fn from_row(row: &RawRow) -> Result<Object> {
                let kind = Kind::from_catalog(row.catalog()).ok_or_else(|| {
                    Error::UnrecognizedRow {
                        catalog: row.catalog().to_string(),
                    }
                })?;
                match kind {
                    $(Kind::$kind => Ok(Object::$kind(<$ty>::from_row(row)?)),)*
                }
            }

            pub fn kind(&self) -> Kind {
                match self {
                    $(Object::$kind(_) => Kind::$kind,)*
                }
            }

            pub fn to_record(&self) -> Result<Record> {
                match self {
                    $(Object::$kind(object) => object.to_record(),)*
                }
            }
        }
    };
}

objects! {
    AggregateDetail => AggregateDetail,
    Cast => Cast,
    Collation => Collation,
    Column => Column,
    Constraint => Constraint,
    Database => Database,
    Description => Description,
    EventTrigger => EventTrigger,
    Extension => Extension,
    Function => Function,
    Namespace => Namespace,
    Operator => Operator,
    Policy => Policy,
    Publication => Publication,
    Relation => Relation,
    RewriteRule => RewriteRule,
    Role => Role,
    Sequence => Sequence,
    Trigger => Trigger,
    Type => Type,
}

/// Extract one raw row into a canonical record.
pub fn extract(row: &RawRow) -> Result<Record> {
    Object::from_row(row)?.to_record()
}

/// Extract every row, failing on the first row that cannot be extracted.
pub fn extract_all<'a>(rows: impl IntoIterator<Item = &'a RawRow>) -> Result<Vec<Record>> {
    rows.into_iter().map(extract).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_catalog_is_unrecognized() {
        let row = RawRow::new("pg_index").with("name", "test_pkey");
        let err = extract(&row).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedRow { ref catalog } if catalog == "pg_index"));
    }

    #[test]
    fn test_extract_all_fails_whole_batch() {
        let good = RawRow::new("pg_namespace")
            .with("name", "app")
            .with("owner", "postgres")
            .with("acl", None::<Vec<String>>);
        let bad = RawRow::new("pg_largeobject");
        assert!(extract_all([&good, &bad]).is_err());
        assert_eq!(extract_all([&good]).unwrap().len(), 1);
    }

    #[test]
    fn test_object_kind_matches_record_kind() {
        let row = RawRow::new("pg_namespace")
            .with("name", "app")
            .with("owner", "postgres")
            .with("acl", None::<Vec<String>>);
        let object = Object::from_row(&row).unwrap();
        assert_eq!(object.kind(), Kind::Namespace);
        assert_eq!(object.to_record().unwrap().kind(), Kind::Namespace);
    }
}
