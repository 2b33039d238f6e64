//! Cluster- and database-level objects: roles, databases, schemas,
//! extensions, event triggers and publications.

use super::CatalogObject;
use crate::{RawRow, Ref, Result};
use pgdiff_catalog::{Attributes, Kind, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    pub name: String,
    pub is_superuser: bool,
    pub inherits: bool,
    pub can_create_role: bool,
    pub can_create_database: bool,
    pub can_login: bool,
    pub replication: bool,
    pub bypass_rls: bool,
    pub connection_limit: i64,
    /// Password hash, when the source is allowed to read it.
    pub password: Option<String>,
    pub valid_until: Option<String>,
    /// Roles this role is a member of.
    pub member_of: Vec<String>,
}

impl CatalogObject for Role {
    const KIND: Kind = Kind::Role;

    fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            name: row.text("name")?,
            is_superuser: row.bool("isSuperuser")?,
            inherits: row.bool("inherits")?,
            can_create_role: row.bool("canCreateRole")?,
            can_create_database: row.bool("canCreateDatabase")?,
            can_login: row.bool("canLogin")?,
            replication: row.bool("replication")?,
            bypass_rls: row.bool("bypassRLS")?,
            connection_limit: row.int("connectionLimit")?,
            password: row.opt_text("password")?,
            valid_until: row.opt_text("validUntil")?,
            member_of: row.list("memberOf")?,
        })
    }

    fn namespace(&self) -> &str {
        ""
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("isSuperuser", self.is_superuser)
            .with("inherits", self.inherits)
            .with("canCreateRole", self.can_create_role)
            .with("canCreateDatabase", self.can_create_database)
            .with("canLogin", self.can_login)
            .with("replication", self.replication)
            .with("bypassRLS", self.bypass_rls)
            .with("connectionLimit", self.connection_limit)
            .with("password", self.password.clone())
            .with("validUntil", self.valid_until.clone())
            .with("memberOf", Value::set(self.member_of.iter().cloned()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Database {
    pub name: String,
    /// Owning role.
    pub dba: Ref,
    pub encoding: String,
    pub locale_provider: String,
    pub collate: String,
    pub lc_type: String,
    pub icu_locale: Option<String>,
    pub icu_rules: Option<String>,
    pub coll_version: Option<String>,
    pub is_template: bool,
    pub allow_connections: bool,
    pub connection_limit: i64,
    pub acl: Option<Vec<String>>,
}

impl CatalogObject for Database {
    const KIND: Kind = Kind::Database;

    fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            name: row.text("name")?,
            dba: row.reference("dba")?,
            encoding: row.text("encoding")?,
            locale_provider: row.text("localeProvider")?,
            collate: row.text("collate")?,
            lc_type: row.text("lcType")?,
            icu_locale: row.opt_text("icuLocale")?,
            icu_rules: row.opt_text("icuRules")?,
            coll_version: row.opt_text("collVersion")?,
            is_template: row.bool("isTemplate")?,
            allow_connections: row.bool("allowConnections")?,
            connection_limit: row.int("connectionLimit")?,
            acl: row.opt_list("acl")?,
        })
    }

    fn namespace(&self) -> &str {
        ""
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("dba", &self.dba)
            .with("encoding", &self.encoding)
            .with("localeProvider", &self.locale_provider)
            .with("collate", &self.collate)
            .with("lcType", &self.lc_type)
            .with("icuLocale", self.icu_locale.clone())
            .with("icuRules", self.icu_rules.clone())
            .with("collVersion", self.coll_version.clone())
            .with("isTemplate", self.is_template)
            .with("allowConnections", self.allow_connections)
            .with("connectionLimit", self.connection_limit)
            .with("acl", self.acl.clone().map(Value::set))
    }
}

/// A schema. Schemas themselves live outside any namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    pub name: String,
    pub owner: Ref,
    pub acl: Option<Vec<String>>,
}

impl CatalogObject for Namespace {
    const KIND: Kind = Kind::Namespace;

    fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            name: row.text("name")?,
            owner: row.reference("owner")?,
            acl: row.opt_list("acl")?,
        })
    }

    fn namespace(&self) -> &str {
        ""
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("owner", &self.owner)
            .with("acl", self.acl.clone().map(Value::set))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
    pub namespace: String,
    pub name: String,
    pub owner: Ref,
    pub version: String,
    pub is_relocatable: bool,
    /// Configuration tables dumped with the extension.
    pub config: Option<Vec<String>>,
    /// `WHERE` filters, one per entry of `config`.
    pub condition: Option<Vec<String>>,
}

impl CatalogObject for Extension {
    const KIND: Kind = Kind::Extension;

    fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            namespace: row.text("namespace")?,
            name: row.text("name")?,
            owner: row.reference("owner")?,
            version: row.text("version")?,
            is_relocatable: row.bool("isRelocatable")?,
            config: row.opt_list("config")?,
            condition: row.opt_list("condition")?,
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
            .with("version", &self.version)
            .with("isRelocatable", self.is_relocatable)
            .with("config", self.config.clone().map(Value::list))
            .with("condition", self.condition.clone().map(Value::list))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventTrigger {
    pub name: String,
    /// `ddl_command_start`, `ddl_command_end`, `sql_drop`, ...
    pub event: String,
    pub owner: Ref,
    pub function: Ref,
    pub enabled: String,
    /// Command tags the trigger is restricted to.
    pub tags: Option<Vec<String>>,
}

impl CatalogObject for EventTrigger {
    const KIND: Kind = Kind::EventTrigger;

    fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            name: row.text("name")?,
            event: row.text("event")?,
            owner: row.reference("owner")?,
            function: row.reference("function")?,
            enabled: row.text("enabled")?,
            tags: row.opt_list("tags")?,
        })
    }

    fn namespace(&self) -> &str {
        ""
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("event", &self.event)
            .with("owner", &self.owner)
            .with("function", &self.function)
            .with("enabled", &self.enabled)
            .with("tags", self.tags.clone().map(Value::set))
    }
}

/// What a publication row covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicationTarget {
    /// One table (`FOR TABLE t`), in the row's namespace.
    Table(String),
    /// Every table of a schema (`FOR TABLES IN SCHEMA s`).
    Schema(String),
    /// `FOR ALL TABLES`.
    AllTables,
}

impl PublicationTarget {
    /// Read the target from a row's `target` and `object` fields.
    pub(crate) fn from_row(row: &RawRow) -> Result<Self> {
        match row.text("target")?.as_str() {
            "table" => Ok(PublicationTarget::Table(row.text("object")?)),
            "schema" => Ok(PublicationTarget::Schema(row.text("object")?)),
            "all" => Ok(PublicationTarget::AllTables),
            other => Err(row.malformed(
                "target",
                format!("unknown publication target `{other}`"),
            )),
        }
    }
}

/// Membership of one table or schema in a publication.
///
/// A publication covering several tables yields one record per table.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    /// Namespace of the published table, or the published schema itself.
    pub namespace: String,
    pub name: String,
    pub target: PublicationTarget,
    pub owner: Ref,
    pub is_all_tables: bool,
    pub is_insert: bool,
    pub is_update: bool,
    pub is_delete: bool,
    pub is_truncate: bool,
    pub is_via_root: bool,
    pub row_filter: Option<String>,
    pub columns: Option<Vec<String>>,
}

impl CatalogObject for Publication {
    const KIND: Kind = Kind::Publication;

    fn from_row(row: &RawRow) -> Result<Self> {
        let target = PublicationTarget::from_row(row)?;
        let namespace = match &target {
            PublicationTarget::Table(_) => row.text("namespace")?,
            PublicationTarget::Schema(schema) => schema.clone(),
            PublicationTarget::AllTables => String::new(),
        };
        Ok(Self {
            namespace,
            name: row.text("name")?,
            target,
            owner: row.reference("owner")?,
            is_all_tables: row.bool("isAllTables")?,
            is_insert: row.bool("isInsert")?,
            is_update: row.bool("isUpdate")?,
            is_delete: row.bool("isDelete")?,
            is_truncate: row.bool("isTruncate")?,
            is_via_root: row.bool("isViaRoot")?,
            row_filter: row.opt_text("rowFilter")?,
            columns: row.opt_list("columns")?,
        })
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> String {
        match &self.target {
            PublicationTarget::Table(table) => format!("{} on {}", self.name, table),
            PublicationTarget::Schema(schema) => format!("{} on schema {}", self.name, schema),
            PublicationTarget::AllTables => format!("{} on all tables", self.name),
        }
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("owner", &self.owner)
            .with("isAllTables", self.is_all_tables)
            .with("isInsert", self.is_insert)
            .with("isUpdate", self.is_update)
            .with("isDelete", self.is_delete)
            .with("isTruncate", self.is_truncate)
            .with("isViaRoot", self.is_via_root)
            .with("rowFilter", self.row_filter.clone())
            .with("columns", self.columns.clone().map(Value::list))
    }
}
