//! JSON wire format for snapshots and change lists.
//!
//! A change is `{classification, kind, namespace, name, extras}` where
//! `extras` holds the `before`/`after` attribute maps and the `delta`. A bare
//! snapshot record uses the same envelope with a `null` classification and
//! its attribute map as `extras`.
//!
//! Values are plain JSON. `null` is an absent value and `"-"` a reference to
//! nothing; lists and sets are both arrays. Because of that, decoding needs
//! the kind's schema to tell a `"-"` reference from the text `"-"` and a set
//! from a list.

use crate::{Change, ChangeList, Classification, Delta, Error, NOT_APPLICABLE, Result, Snapshot};
use facet::Facet;
use indexmap::IndexMap;
use pgdiff_catalog::{AttrType, Attributes, Identity, Kind, Record, Value};

/// A non-null JSON value.
#[derive(Debug, Clone, PartialEq, Facet)]
#[facet(untagged)]
#[repr(u8)]
pub enum WireValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Lists and sets alike.
    List(Vec<String>),
}

type WireAttributes = IndexMap<String, Option<WireValue>>;

#[derive(Debug, Clone, PartialEq, Facet)]
pub struct WirePair {
    pub before: Option<WireValue>,
    pub after: Option<WireValue>,
}

#[derive(Debug, Clone, PartialEq, Facet)]
pub struct WireExtras {
    #[facet(default)]
    pub before: Option<WireAttributes>,
    #[facet(default)]
    pub after: Option<WireAttributes>,
    #[facet(default)]
    pub delta: Option<IndexMap<String, WirePair>>,
}

#[derive(Debug, Clone, PartialEq, Facet)]
pub struct WireChange {
    pub classification: Classification,
    pub kind: Kind,
    pub namespace: String,
    pub name: String,
    pub extras: WireExtras,
}

/// A snapshot record; `classification` is always `null`.
#[derive(Debug, Clone, PartialEq, Facet)]
pub struct WireRecord {
    #[facet(default)]
    pub classification: Option<Classification>,
    pub kind: Kind,
    pub namespace: String,
    pub name: String,
    pub extras: WireAttributes,
}

fn encode_value(value: &Value) -> Option<WireValue> {
    match value {
        Value::Absent => None,
        Value::NotApplicable => Some(WireValue::Text(NOT_APPLICABLE.to_string())),
        Value::Bool(b) => Some(WireValue::Bool(*b)),
        Value::Int(i) => Some(WireValue::Int(*i)),
        Value::Float(x) => Some(WireValue::Float(*x)),
        Value::Text(s) => Some(WireValue::Text(s.clone())),
        Value::List(items) | Value::Set(items) => Some(WireValue::List(
            items
                .iter()
                .map(|item| match item {
                    Value::Text(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        )),
    }
}

fn encode_attributes(attributes: &Attributes) -> WireAttributes {
    attributes
        .iter()
        .map(|(name, value)| (name.to_string(), encode_value(value)))
        .collect()
}

/// Decode one value using the schema of `kind`.
fn decode_value(kind: Kind, attribute: &str, value: Option<WireValue>) -> Result<Value> {
    let spec = kind
        .attribute(attribute)
        .ok_or_else(|| Error::Wire(format!("{kind} records have no attribute `{attribute}`")))?;
    Ok(match (spec.ty, value) {
        (_, None) => Value::Absent,
        (AttrType::Reference, Some(WireValue::Text(s))) if s == NOT_APPLICABLE => {
            Value::NotApplicable
        }
        (AttrType::Float, Some(WireValue::Int(i))) => Value::Float(i as f64),
        (AttrType::Set, Some(WireValue::List(items))) => Value::set(items),
        (_, Some(WireValue::List(items))) => Value::list(items),
        (_, Some(WireValue::Bool(b))) => Value::Bool(b),
        (_, Some(WireValue::Int(i))) => Value::Int(i),
        (_, Some(WireValue::Float(x))) => Value::Float(x),
        (_, Some(WireValue::Text(s))) => Value::Text(s),
    })
}

fn decode_attributes(kind: Kind, attributes: WireAttributes) -> Result<Attributes> {
    attributes
        .into_iter()
        .map(|(name, value)| {
            let value = decode_value(kind, &name, value)?;
            Ok((name, value))
        })
        .collect()
}

/// Decode attributes and validate them as a whole record.
fn decode_record(identity: &Identity, attributes: WireAttributes) -> Result<Record> {
    let attributes = decode_attributes(identity.kind, attributes)?;
    Record::new(
        identity.kind,
        identity.namespace.clone(),
        identity.name.clone(),
        attributes,
    )
    .map_err(|violation| Error::Wire(format!("{identity}: {violation}")))
}

impl From<&Record> for WireRecord {
    fn from(record: &Record) -> Self {
        Self {
            classification: None,
            kind: record.kind(),
            namespace: record.namespace().to_string(),
            name: record.name().to_string(),
            extras: encode_attributes(record.attributes()),
        }
    }
}

impl From<&Change> for WireChange {
    fn from(change: &Change) -> Self {
        Self {
            classification: change.classification,
            kind: change.identity.kind,
            namespace: change.identity.namespace.clone(),
            name: change.identity.name.clone(),
            extras: WireExtras {
                before: change.before.as_ref().map(encode_attributes),
                after: change.after.as_ref().map(encode_attributes),
                delta: change.delta.as_ref().map(|delta| {
                    delta
                        .iter()
                        .map(|(name, before, after)| {
                            let pair = WirePair {
                                before: encode_value(before),
                                after: encode_value(after),
                            };
                            (name.to_string(), pair)
                        })
                        .collect()
                }),
            },
        }
    }
}

impl TryFrom<WireChange> for Change {
    type Error = Error;

    fn try_from(wire: WireChange) -> Result<Self> {
        let identity = Identity::new(wire.kind, wire.namespace, wire.name);
        let before = wire
            .extras
            .before
            .map(|attrs| decode_record(&identity, attrs).map(|r| r.into_parts().1))
            .transpose()?;
        let after = wire
            .extras
            .after
            .map(|attrs| decode_record(&identity, attrs).map(|r| r.into_parts().1))
            .transpose()?;
        let delta = wire
            .extras
            .delta
            .map(|delta| {
                delta
                    .into_iter()
                    .map(|(name, pair)| {
                        let before = decode_value(identity.kind, &name, pair.before)?;
                        let after = decode_value(identity.kind, &name, pair.after)?;
                        Ok((name, (before, after)))
                    })
                    .collect::<Result<Delta>>()
            })
            .transpose()?;

        let shape_ok = match wire.classification {
            Classification::Added => before.is_none() && after.is_some() && delta.is_none(),
            Classification::Removed => before.is_some() && after.is_none() && delta.is_none(),
            Classification::Modified => before.is_some() && after.is_some() && delta.is_some(),
        };
        if !shape_ok {
            return Err(Error::Wire(format!(
                "{} change to {identity} has the wrong extras",
                wire.classification
            )));
        }

        Ok(Change {
            classification: wire.classification,
            identity,
            before,
            after,
            delta,
        })
    }
}

impl Snapshot {
    /// Serialize as a JSON array of bare records.
    pub fn to_json(&self) -> Result<String> {
        let records: Vec<WireRecord> = self.records().map(WireRecord::from).collect();
        facet_json::to_string(&records).map_err(|e| Error::Wire(e.to_string()))
    }

    /// Read a snapshot written by [`Snapshot::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        let wire: Vec<WireRecord> =
            facet_json::from_str(json).map_err(|e| Error::Wire(e.to_string()))?;
        let records = wire
            .into_iter()
            .map(|record| {
                if let Some(classification) = record.classification {
                    return Err(Error::Wire(format!(
                        "snapshot record classified as {classification}"
                    )));
                }
                let identity = Identity::new(record.kind, record.namespace, record.name);
                decode_record(&identity, record.extras)
            })
            .collect::<Result<Vec<_>>>()?;
        Snapshot::new(records)
    }
}

impl ChangeList {
    /// Serialize as a JSON array of changes.
    pub fn to_json(&self) -> Result<String> {
        let changes: Vec<WireChange> = self.iter().map(WireChange::from).collect();
        facet_json::to_string(&changes).map_err(|e| Error::Wire(e.to_string()))
    }

    /// Read a change list written by [`ChangeList::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        let wire: Vec<WireChange> =
            facet_json::from_str(json).map_err(|e| Error::Wire(e.to_string()))?;
        let changes = wire
            .into_iter()
            .map(Change::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(ChangeList::new(changes))
    }
}
