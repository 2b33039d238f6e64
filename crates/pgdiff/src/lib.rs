//! Attribute-level diffing of Postgres catalog snapshots.
//!
//! pgdiff answers one question: which schema objects were added, removed or
//! changed between two inspections of a database, and which of their
//! attributes changed.
//!
//! # Pipeline
//!
//! ```text
//! RawRow ──extract──> Record ──IdentityIndex──> Snapshot ─┐
//!                                                          ├─diff──> ChangeList
//! RawRow ──extract──> Record ──IdentityIndex──> Snapshot ─┘
//! ```
//!
//! - A [`CatalogSource`] hands over [`RawRow`]s with every foreign reference
//!   already resolved to a name. Querying Postgres is the source's job.
//! - [`inspect`] drops rows in reserved schemas, runs one [extractor](extract)
//!   per catalog, checks that every comment points at something, and builds
//!   a [`Snapshot`].
//! - [`diff`] reconciles two snapshots identity by identity into a
//!   [`ChangeList`] ordered by `(kind, namespace, name)`.
//!
//! # Example
//!
//! ```
//! use pgdiff::{InspectConfig, RawRow, RawValue, diff, inspect};
//!
//! let schema = |name: &str| {
//!     RawRow::new("pg_namespace")
//!         .with("name", name)
//!         .with("owner", "postgres")
//!         .with("acl", RawValue::Null)
//! };
//!
//! let config = InspectConfig::default();
//! let before = inspect(&vec![schema("public")], &config)?;
//! let after = inspect(&vec![schema("public"), schema("app")], &config)?;
//!
//! let changes = diff(&before, &after);
//! assert_eq!(changes.len(), 1);
//! assert_eq!(changes.to_string(), "Changes detected:\n\n  + namespace app\n");
//! # Ok::<(), pgdiff::Error>(())
//! ```

mod annotate;
mod config;
mod diff;
mod error;
pub mod extract;
mod index;
mod inspect;
mod row;
mod snapshot;
mod wire;

pub use annotate::{attach, dangling, target_of};
pub use config::InspectConfig;
pub use diff::{Change, ChangeList, Classification, Delta, Summary, diff, diff_indexes};
pub use error::{Error, Result};
pub use extract::{CatalogObject, extract, extract_all};
pub use index::IdentityIndex;
pub use inspect::inspect;
pub use row::{CatalogSource, NOT_APPLICABLE, RawRow, RawValue, Ref};
pub use snapshot::Snapshot;
pub use wire::{WireChange, WireExtras, WirePair, WireRecord, WireValue};

pub use pgdiff_catalog::{
    AttrSpec, AttrType, Attributes, Identity, Kind, Record, SchemaViolation, Value,
};
