use pgdiff_catalog::{Identity, Record};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no extractor for catalog row from `{catalog}`")]
    UnrecognizedRow { catalog: String },

    #[error("cannot normalize `{field}` of {catalog} row: {reason}")]
    MalformedAttribute {
        catalog: String,
        field: String,
        reason: String,
    },

    #[error("duplicate identity {identity}")]
    DuplicateIdentity {
        identity: Identity,
        first: Box<Record>,
        second: Box<Record>,
    },

    #[error("catalog source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid wire data: {0}")]
    Wire(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
