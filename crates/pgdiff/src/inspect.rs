//! Turning a catalog source into a [`Snapshot`].

use crate::extract;
use crate::{
    CatalogSource, Error, IdentityIndex, InspectConfig, RawRow, RawValue, Result, Snapshot,
    annotate,
};
use pgdiff_catalog::Kind;
use tracing::field::Empty;

/// The schema a raw row belongs to, if any.
///
/// Schemas are filtered by their own name. Publication rows covering a whole
/// schema carry it in `object`.
fn owning_namespace(row: &RawRow) -> Option<&str> {
    let field = match row.catalog() {
        "pg_namespace" => "name",
        "pg_publication"
            if matches!(row.get("target"), Some(RawValue::Text(t)) if t == "schema") =>
        {
            "object"
        }
        _ => "namespace",
    };
    match row.get(field) {
        Some(RawValue::Text(namespace)) => Some(namespace.as_str()),
        _ => None,
    }
}

/// Read every row from `source` and normalize it into a snapshot.
///
/// Rows in reserved namespaces and rows of skipped kinds are dropped before
/// extraction. Any row that cannot be extracted fails the whole inspection;
/// no partial snapshot is ever returned.
pub fn inspect<S>(source: &S, config: &InspectConfig) -> Result<Snapshot>
where
    S: CatalogSource + ?Sized,
{
    let rows = source.rows().map_err(|e| Error::Source(Box::new(e)))?;

    let span = tracing::debug_span!("pgdiff.inspect", rows = rows.len(), records = Empty);
    let _guard = span.enter();

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let kind = Kind::from_catalog(row.catalog()).ok_or_else(|| Error::UnrecognizedRow {
            catalog: row.catalog().to_string(),
        })?;

        if let Some(namespace) = owning_namespace(row).filter(|ns| config.is_reserved(ns)) {
            tracing::trace!(
                catalog = row.catalog(),
                namespace,
                "skipping row in reserved namespace"
            );
            continue;
        }
        if config.skips(kind) {
            tracing::trace!(catalog = row.catalog(), %kind, "skipping row of skipped kind");
            continue;
        }

        records.push(extract::extract(row)?);
    }

    records.retain(|record| match annotate::target_of(record) {
        Some(target) if config.skips(target.kind) => {
            tracing::trace!(
                comment = %record.identity(),
                %target,
                "skipping comment on skipped kind"
            );
            false
        }
        _ => true,
    });

    let index = IdentityIndex::build(records)?;
    annotate::verify_targets(&index, config.allow_dangling_comments)?;

    span.record("records", index.len());
    Ok(Snapshot::from_index(index))
}
