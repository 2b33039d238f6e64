//! Static attribute schemas, one per [`Kind`].
//!
//! The schema decides everything the differ must not: which attributes a kind
//! has, which may be null, which hold references (and may therefore be
//! "not applicable"), and whether a sequence is compared in order or as a set.

use crate::{Kind, SchemaViolation, Value};
use std::fmt;

/// Type of a schema attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrType {
    Bool,
    Int,
    Float,
    /// Free text or a single-letter catalog code.
    Text,
    /// The resolved name of another object, or not-applicable.
    Reference,
    /// Order-sensitive sequence of names.
    List,
    /// Order-insensitive set of names.
    Set,
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttrType::Bool => "bool",
            AttrType::Int => "int",
            AttrType::Float => "float",
            AttrType::Text => "text",
            AttrType::Reference => "reference",
            AttrType::List => "list",
            AttrType::Set => "set",
        })
    }
}

/// One attribute of a kind's schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrSpec {
    pub name: &'static str,
    pub ty: AttrType,
    /// Whether the attribute may be [`Value::Absent`].
    pub nullable: bool,
}

const fn req(name: &'static str, ty: AttrType) -> AttrSpec {
    AttrSpec {
        name,
        ty,
        nullable: false,
    }
}

const fn opt(name: &'static str, ty: AttrType) -> AttrSpec {
    AttrSpec {
        name,
        ty,
        nullable: true,
    }
}

impl AttrSpec {
    /// Check that `value` is legal for this attribute.
    ///
    /// `NotApplicable` is only legal on references and `Absent` only on
    /// nullable attributes, so each attribute has exactly one way to say
    /// "nothing here".
    pub fn check(&self, kind: Kind, value: &Value) -> Result<(), SchemaViolation> {
        let sentinel = |sentinel| SchemaViolation::IllegalSentinel {
            kind,
            attribute: self.name.to_string(),
            sentinel,
        };
        let mismatch = |found| SchemaViolation::TypeMismatch {
            kind,
            attribute: self.name.to_string(),
            expected: self.ty,
            found,
        };

        match (self.ty, value) {
            (_, Value::Absent) if self.nullable => Ok(()),
            (_, Value::Absent) => Err(sentinel("null")),
            (AttrType::Reference, Value::NotApplicable | Value::Text(_)) => Ok(()),
            (_, Value::NotApplicable) => Err(sentinel("not-applicable")),
            (AttrType::Bool, Value::Bool(_))
            | (AttrType::Int, Value::Int(_))
            | (AttrType::Float, Value::Float(_))
            | (AttrType::Text, Value::Text(_)) => Ok(()),
            (AttrType::List, Value::List(items)) | (AttrType::Set, Value::Set(items)) => {
                match items.iter().find(|item| !matches!(item, Value::Text(_))) {
                    Some(item) => Err(mismatch(item.type_name())),
                    None => Ok(()),
                }
            }
            (_, other) => Err(mismatch(other.type_name())),
        }
    }
}

use AttrType::{Bool, Float, Int, List, Reference, Set, Text};

const RELATION: &[AttrSpec] = &[
    req("kind", Text),
    req("type", Reference),
    req("owner", Reference),
    req("ofType", Reference),
    opt("accessMethod", Reference),
    opt("tableSpace", Reference),
    req("persistence", Text),
    req("isShared", Bool),
    req("isPartition", Bool),
    opt("partitionBound", Text),
    req("rowSecurity", Bool),
    req("forceRowSecurity", Bool),
    req("replicaIdentity", Text),
    opt("options", Set),
    opt("acl", Set),
];

const COLUMN: &[AttrSpec] = &[
    req("relation", Text),
    req("type", Reference),
    req("length", Int),
    req("dimensions", Int),
    req("notNull", Bool),
    req("hasDefault", Bool),
    opt("default", Text),
    req("hasMissing", Bool),
    opt("missingValue", Text),
    req("identity", Text),
    req("generated", Text),
    req("isLocal", Bool),
    req("ancestors", Int),
    req("collation", Reference),
    req("statistics", Int),
    req("compression", Text),
    opt("options", Set),
    opt("fdwOptions", Set),
    opt("acl", Set),
];

const FUNCTION: &[AttrSpec] = &[
    req("kind", Text),
    req("owner", Reference),
    req("language", Reference),
    req("returnType", Reference),
    req("returnsSet", Bool),
    req("numberOfArgs", Int),
    req("numberOfArgsWithDefaults", Int),
    req("argumentTypes", List),
    opt("argumentModes", List),
    opt("argumentNames", List),
    opt("argumentDefaults", Text),
    req("variadic", Reference),
    req("volatility", Text),
    req("parallelism", Text),
    req("isStrict", Bool),
    req("isLeakProof", Bool),
    req("isSecurityDefiner", Bool),
    req("cost", Float),
    req("rows", Float),
    opt("source", Text),
    opt("bin", Text),
    opt("sqlBody", Text),
    opt("config", Set),
    opt("acl", Set),
];

const AGGREGATE_DETAIL: &[AttrSpec] = &[
    req("kind", Text),
    req("numberOfDirectArgs", Int),
    req("transitionFunction", Reference),
    req("finalFunction", Reference),
    req("combineFunction", Reference),
    req("serialFunction", Reference),
    req("deserialFunction", Reference),
    req("movingTransitionFunction", Reference),
    req("movingInverseFunction", Reference),
    req("movingFinalFunction", Reference),
    req("finalExtra", Bool),
    req("movingFinalExtra", Bool),
    req("finalModify", Text),
    req("movingFinalModify", Text),
    req("sortOperator", Reference),
    req("stateType", Reference),
    req("stateSpace", Int),
    req("movingStateType", Reference),
    req("movingStateSpace", Int),
    opt("initialValue", Text),
    opt("movingInitialValue", Text),
];

const CONSTRAINT: &[AttrSpec] = &[
    req("type", Text),
    req("relation", Reference),
    req("domain", Reference),
    req("index", Reference),
    opt("parent", Reference),
    req("references", Reference),
    req("definition", Text),
    req("deferrable", Bool),
    req("deferred", Bool),
    req("validated", Bool),
    req("isLocal", Bool),
    req("noInherit", Bool),
    req("inherited", Int),
    req("onUpdate", Text),
    req("onDelete", Text),
    req("onMatch", Text),
];

const TRIGGER: &[AttrSpec] = &[
    req("type", Int),
    req("function", Reference),
    req("enabled", Text),
    req("isClone", Bool),
    req("isDeferral", Bool),
    req("isDeferred", Bool),
    req("definition", Text),
];

const REWRITE_RULE: &[AttrSpec] = &[
    req("type", Text),
    req("enabled", Text),
    req("isInstead", Bool),
    req("definition", Text),
];

const TYPE: &[AttrSpec] = &[
    req("type", Text),
    req("category", Text),
    req("isPreferred", Bool),
    req("isDefined", Bool),
    req("isByValue", Bool),
    req("length", Int),
    req("align", Text),
    req("storage", Text),
    req("delimiter", Text),
    req("owner", Reference),
    req("relation", Reference),
    req("array", Reference),
    req("baseType", Reference),
    req("collation", Reference),
    req("subscript", Reference),
    req("inputFunction", Reference),
    req("outputFunction", Reference),
    req("receiveFunction", Reference),
    req("sendFunction", Reference),
    req("modifierInputFunction", Reference),
    req("modifierOutputFunction", Reference),
    req("analyzeFunction", Reference),
    req("notNull", Bool),
    req("typeMod", Int),
    req("numberOfDimensions", Int),
    opt("default", Text),
    opt("enumLabels", List),
    opt("acl", Set),
];

const SEQUENCE: &[AttrSpec] = &[
    req("type", Reference),
    req("start", Int),
    req("increment", Int),
    req("maxValue", Int),
    req("minValue", Int),
    req("cacheValue", Int),
    req("isCycled", Bool),
];

const ROLE: &[AttrSpec] = &[
    req("isSuperuser", Bool),
    req("inherits", Bool),
    req("canCreateRole", Bool),
    req("canCreateDatabase", Bool),
    req("canLogin", Bool),
    req("replication", Bool),
    req("bypassRLS", Bool),
    req("connectionLimit", Int),
    opt("password", Text),
    opt("validUntil", Text),
    req("memberOf", Set),
];

const CAST: &[AttrSpec] = &[
    req("function", Reference),
    req("context", Text),
    req("method", Text),
];

const OPERATOR: &[AttrSpec] = &[
    req("kind", Text),
    req("owner", Reference),
    req("left", Reference),
    req("right", Reference),
    req("result", Reference),
    req("code", Reference),
    opt("commutator", Reference),
    opt("negator", Reference),
    req("restriction", Reference),
    req("join", Reference),
    req("canHash", Bool),
    req("canMerge", Bool),
];

const POLICY: &[AttrSpec] = &[
    req("command", Text),
    req("isPermissive", Bool),
    req("roles", List),
    opt("using", Text),
    opt("withCheck", Text),
];

const PUBLICATION: &[AttrSpec] = &[
    req("owner", Reference),
    req("isAllTables", Bool),
    req("isInsert", Bool),
    req("isUpdate", Bool),
    req("isDelete", Bool),
    req("isTruncate", Bool),
    req("isViaRoot", Bool),
    opt("rowFilter", Text),
    opt("columns", List),
];

const EXTENSION: &[AttrSpec] = &[
    req("owner", Reference),
    req("version", Text),
    req("isRelocatable", Bool),
    opt("config", List),
    opt("condition", List),
];

const DATABASE: &[AttrSpec] = &[
    req("dba", Reference),
    req("encoding", Text),
    req("localeProvider", Text),
    req("collate", Text),
    req("lcType", Text),
    opt("icuLocale", Text),
    opt("icuRules", Text),
    opt("collVersion", Text),
    req("isTemplate", Bool),
    req("allowConnections", Bool),
    req("connectionLimit", Int),
    opt("acl", Set),
];

const NAMESPACE: &[AttrSpec] = &[req("owner", Reference), opt("acl", Set)];

const EVENT_TRIGGER: &[AttrSpec] = &[
    req("event", Text),
    req("owner", Reference),
    req("function", Reference),
    req("enabled", Text),
    opt("tags", Set),
];

const COLLATION: &[AttrSpec] = &[
    req("owner", Reference),
    req("provider", Text),
    req("deterministic", Bool),
    req("encoding", Text),
    opt("collate", Text),
    opt("type", Text),
    opt("locale", Text),
    opt("rules", Text),
    opt("version", Text),
];

const DESCRIPTION: &[AttrSpec] = &[
    req("target", Text),
    req("object", Text),
    opt("column", Text),
    req("description", Text),
];

pub(crate) fn attributes(kind: Kind) -> &'static [AttrSpec] {
    match kind {
        Kind::AggregateDetail => AGGREGATE_DETAIL,
        Kind::Cast => CAST,
        Kind::Collation => COLLATION,
        Kind::Column => COLUMN,
        Kind::Constraint => CONSTRAINT,
        Kind::Database => DATABASE,
        Kind::Description => DESCRIPTION,
        Kind::EventTrigger => EVENT_TRIGGER,
        Kind::Extension => EXTENSION,
        Kind::Function => FUNCTION,
        Kind::Namespace => NAMESPACE,
        Kind::Operator => OPERATOR,
        Kind::Policy => POLICY,
        Kind::Publication => PUBLICATION,
        Kind::Relation => RELATION,
        Kind::RewriteRule => REWRITE_RULE,
        Kind::Role => ROLE,
        Kind::Sequence => SEQUENCE,
        Kind::Trigger => TRIGGER,
        Kind::Type => TYPE,
    }
}
