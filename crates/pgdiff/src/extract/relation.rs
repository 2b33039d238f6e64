//! Relations and the objects that hang off them.

use super::CatalogObject;
use crate::{RawRow, Ref, Result};
use pgdiff_catalog::{Attributes, Kind, Value};

/// A table, view, materialized view, partitioned table or foreign table.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub namespace: String,
    pub name: String,
    /// `relkind`: `r`, `v`, `m`, `p` or `f`.
    pub kind: String,
    /// The composite type describing the row.
    pub row_type: Ref,
    pub owner: Ref,
    /// Type of a typed table (`CREATE TABLE ... OF type`).
    pub of_type: Ref,
    /// `None` for relations without storage (views, ...).
    pub access_method: Option<Ref>,
    /// `None` in the database's default tablespace.
    pub table_space: Option<Ref>,
    /// `p` permanent, `u` unlogged, `t` temporary.
    pub persistence: String,
    pub is_shared: bool,
    pub is_partition: bool,
    pub partition_bound: Option<String>,
    pub row_security: bool,
    pub force_row_security: bool,
    pub replica_identity: String,
    pub options: Option<Vec<String>>,
    pub acl: Option<Vec<String>>,
}

impl CatalogObject for Relation {
    const KIND: Kind = Kind::Relation;

    fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            namespace: row.text("namespace")?,
            name: row.text("name")?,
            kind: row.text("kind")?,
            row_type: row.reference("type")?,
            owner: row.reference("owner")?,
            of_type: row.reference("ofType")?,
            access_method: row.opt_reference("accessMethod")?,
            table_space: row.opt_reference("tableSpace")?,
            persistence: row.text("persistence")?,
            is_shared: row.bool("isShared")?,
            is_partition: row.bool("isPartition")?,
            partition_bound: row.opt_text("partitionBound")?,
            row_security: row.bool("rowSecurity")?,
            force_row_security: row.bool("forceRowSecurity")?,
            replica_identity: row.text("replicaIdentity")?,
            options: row.opt_list("options")?,
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
            .with("kind", &self.kind)
            .with("type", &self.row_type)
            .with("owner", &self.owner)
            .with("ofType", &self.of_type)
            .with("accessMethod", self.access_method.as_ref())
            .with("tableSpace", self.table_space.as_ref())
            .with("persistence", &self.persistence)
            .with("isShared", self.is_shared)
            .with("isPartition", self.is_partition)
            .with("partitionBound", self.partition_bound.clone())
            .with("rowSecurity", self.row_security)
            .with("forceRowSecurity", self.force_row_security)
            .with("replicaIdentity", &self.replica_identity)
            .with("options", self.options.clone().map(Value::set))
            .with("acl", self.acl.clone().map(Value::set))
    }
}

/// A column of a relation.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub namespace: String,
    pub relation: String,
    pub name: String,
    pub data_type: Ref,
    pub length: i64,
    pub dimensions: i64,
    pub not_null: bool,
    pub has_default: bool,
    /// Default expression, as rendered by `pg_get_expr`.
    pub default: Option<String>,
    pub has_missing: bool,
    pub missing_value: Option<String>,
    /// `a` always, `d` by default, or empty.
    pub identity: String,
    /// `s` stored, or empty.
    pub generated: String,
    pub is_local: bool,
    pub ancestors: i64,
    pub collation: Ref,
    pub statistics: i64,
    pub compression: String,
    pub options: Option<Vec<String>>,
    pub fdw_options: Option<Vec<String>>,
    pub acl: Option<Vec<String>>,
}

impl CatalogObject for Column {
    const KIND: Kind = Kind::Column;

    fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            namespace: row.text("namespace")?,
            relation: row.text("relation")?,
            name: row.text("name")?,
            data_type: row.reference("type")?,
            length: row.int("length")?,
            dimensions: row.int("dimensions")?,
            not_null: row.bool("notNull")?,
            has_default: row.bool("hasDefault")?,
            default: row.opt_text("default")?,
            has_missing: row.bool("hasMissing")?,
            missing_value: row.opt_text("missingValue")?,
            identity: row.text("identity")?,
            generated: row.text("generated")?,
            is_local: row.bool("isLocal")?,
            ancestors: row.int("ancestors")?,
            collation: row.reference("collation")?,
            statistics: row.int("statistics")?,
            compression: row.text("compression")?,
            options: row.opt_list("options")?,
            fdw_options: row.opt_list("fdwOptions")?,
            acl: row.opt_list("acl")?,
        })
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> String {
        format!("{}.{}", self.relation, self.name)
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("relation", &self.relation)
            .with("type", &self.data_type)
            .with("length", self.length)
            .with("dimensions", self.dimensions)
            .with("notNull", self.not_null)
            .with("hasDefault", self.has_default)
            .with("default", self.default.clone())
            .with("hasMissing", self.has_missing)
            .with("missingValue", self.missing_value.clone())
            .with("identity", &self.identity)
            .with("generated", &self.generated)
            .with("isLocal", self.is_local)
            .with("ancestors", self.ancestors)
            .with("collation", &self.collation)
            .with("statistics", self.statistics)
            .with("compression", &self.compression)
            .with("options", self.options.clone().map(Value::set))
            .with("fdwOptions", self.fdw_options.clone().map(Value::set))
            .with("acl", self.acl.clone().map(Value::set))
    }
}

/// A table or domain constraint.
///
/// Constraint names are only unique per table (or domain), so the identity
/// name carries the owner: `test_pkey on test`, `positive on domain amount`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub namespace: String,
    pub name: String,
    /// `contype`: `c`, `f`, `n`, `p`, `u`, `t` or `x`.
    pub constraint_type: String,
    pub relation: Ref,
    pub domain: Ref,
    pub index: Ref,
    /// Parent constraint of a partition's constraint.
    pub parent: Option<Ref>,
    pub references: Ref,
    pub definition: String,
    pub deferrable: bool,
    pub deferred: bool,
    pub validated: bool,
    pub is_local: bool,
    pub no_inherit: bool,
    pub inherited: i64,
    pub on_update: String,
    pub on_delete: String,
    pub on_match: String,
}

impl CatalogObject for Constraint {
    const KIND: Kind = Kind::Constraint;

    fn from_row(row: &RawRow) -> Result<Self> {
        let constraint = Self {
            namespace: row.text("namespace")?,
            name: row.text("name")?,
            constraint_type: row.text("type")?,
            relation: row.reference("relation")?,
            domain: row.reference("domain")?,
            index: row.reference("index")?,
            parent: row.opt_reference("parent")?,
            references: row.reference("references")?,
            definition: row.text("definition")?,
            deferrable: row.bool("deferrable")?,
            deferred: row.bool("deferred")?,
            validated: row.bool("validated")?,
            is_local: row.bool("isLocal")?,
            no_inherit: row.bool("noInherit")?,
            inherited: row.int("inherited")?,
            on_update: row.text("onUpdate")?,
            on_delete: row.text("onDelete")?,
            on_match: row.text("onMatch")?,
        };

        if constraint.relation.name().is_none() && constraint.domain.name().is_none() {
            return Err(row.malformed("relation", "constraint has neither a table nor a domain"));
        }

        Ok(constraint)
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> String {
        match (&self.relation, &self.domain) {
            (Ref::Named(table), _) => format!("{} on {}", self.name, table),
            (Ref::NotApplicable, domain) => format!("{} on domain {}", self.name, domain),
        }
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("type", &self.constraint_type)
            .with("relation", &self.relation)
            .with("domain", &self.domain)
            .with("index", &self.index)
            .with("parent", self.parent.as_ref())
            .with("references", &self.references)
            .with("definition", &self.definition)
            .with("deferrable", self.deferrable)
            .with("deferred", self.deferred)
            .with("validated", self.validated)
            .with("isLocal", self.is_local)
            .with("noInherit", self.no_inherit)
            .with("inherited", self.inherited)
            .with("onUpdate", &self.on_update)
            .with("onDelete", &self.on_delete)
            .with("onMatch", &self.on_match)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub namespace: String,
    pub name: String,
    pub relation: String,
    /// `tgtype` bit mask (row/statement, timing, events).
    pub trigger_type: i64,
    pub function: Ref,
    pub enabled: String,
    pub is_clone: bool,
    pub is_deferral: bool,
    pub is_deferred: bool,
    pub definition: String,
}

impl CatalogObject for Trigger {
    const KIND: Kind = Kind::Trigger;

    fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            namespace: row.text("namespace")?,
            name: row.text("name")?,
            relation: row.text("relation")?,
            trigger_type: row.int("type")?,
            function: row.reference("function")?,
            enabled: row.text("enabled")?,
            is_clone: row.bool("isClone")?,
            is_deferral: row.bool("isDeferral")?,
            is_deferred: row.bool("isDeferred")?,
            definition: row.text("definition")?,
        })
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> String {
        format!("{} on {}", self.name, self.relation)
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("type", self.trigger_type)
            .with("function", &self.function)
            .with("enabled", &self.enabled)
            .with("isClone", self.is_clone)
            .with("isDeferral", self.is_deferral)
            .with("isDeferred", self.is_deferred)
            .with("definition", &self.definition)
    }
}

/// A rewrite rule, including the `_RETURN` rule behind every view.
#[derive(Debug, Clone, PartialEq)]
pub struct RewriteRule {
    pub namespace: String,
    pub name: String,
    pub relation: String,
    /// `ev_type`: `1` select, `2` update, `3` insert, `4` delete.
    pub event: String,
    pub enabled: String,
    pub is_instead: bool,
    pub definition: String,
}

impl CatalogObject for RewriteRule {
    const KIND: Kind = Kind::RewriteRule;

    fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            namespace: row.text("namespace")?,
            name: row.text("name")?,
            relation: row.text("relation")?,
            event: row.text("type")?,
            enabled: row.text("enabled")?,
            is_instead: row.bool("isInstead")?,
            definition: row.text("definition")?,
        })
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> String {
        format!("{} on {}", self.name, self.relation)
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("type", &self.event)
            .with("enabled", &self.enabled)
            .with("isInstead", self.is_instead)
            .with("definition", &self.definition)
    }
}

/// A row-level security policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    pub namespace: String,
    pub name: String,
    pub relation: String,
    /// `r` select, `a` insert, `w` update, `d` delete, `*` all.
    pub command: String,
    pub is_permissive: bool,
    pub roles: Vec<String>,
    pub using: Option<String>,
    pub with_check: Option<String>,
}

impl CatalogObject for Policy {
    const KIND: Kind = Kind::Policy;

    fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            namespace: row.text("namespace")?,
            name: row.text("name")?,
            relation: row.text("relation")?,
            command: row.text("command")?,
            is_permissive: row.bool("isPermissive")?,
            roles: row.list("roles")?,
            using: row.opt_text("using")?,
            with_check: row.opt_text("withCheck")?,
        })
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> String {
        format!("{} on {}", self.name, self.relation)
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("command", &self.command)
            .with("isPermissive", self.is_permissive)
            .with("roles", Value::list(self.roles.iter().cloned()))
            .with("using", self.using.clone())
            .with("withCheck", self.with_check.clone())
    }
}
