//! Inspection settings.
//!
//! Defaults reproduce the usual filter: Postgres' own schemas and per-session
//! temporary schemas are never inspected.

use crate::{Error, Result};
use facet::Facet;
use pgdiff_catalog::Kind;
use std::path::Path;

/// What [`inspect`](crate::inspect) reads and what it drops.
#[derive(Debug, Clone, PartialEq, Facet)]
pub struct InspectConfig {
    /// Schemas whose objects are dropped before extraction.
    pub reserved_namespaces: Vec<String>,
    /// Schema name prefixes treated like `reserved_namespaces`.
    pub reserved_prefixes: Vec<String>,
    /// Kinds dropped before extraction, along with comments on them.
    pub skip_kinds: Vec<Kind>,
    /// Keep comments whose target is not in the snapshot instead of failing.
    pub allow_dangling_comments: bool,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            reserved_namespaces: ["information_schema", "pg_catalog", "pg_toast"]
                .map(String::from)
                .to_vec(),
            reserved_prefixes: ["pg_temp_", "pg_toast_temp_"].map(String::from).to_vec(),
            skip_kinds: Vec::new(),
            allow_dangling_comments: false,
        }
    }
}

/// On-disk shape: every field optional, missing ones take the default.
#[derive(Debug, Facet)]
struct ConfigFile {
    #[facet(default)]
    reserved_namespaces: Option<Vec<String>>,
    #[facet(default)]
    reserved_prefixes: Option<Vec<String>>,
    #[facet(default)]
    skip_kinds: Option<Vec<Kind>>,
    #[facet(default)]
    allow_dangling_comments: Option<bool>,
}

impl InspectConfig {
    /// Parse a JSON config, defaulting any field it leaves out.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ConfigFile =
            facet_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        let defaults = Self::default();
        Ok(Self {
            reserved_namespaces: file
                .reserved_namespaces
                .unwrap_or(defaults.reserved_namespaces),
            reserved_prefixes: file.reserved_prefixes.unwrap_or(defaults.reserved_prefixes),
            skip_kinds: file.skip_kinds.unwrap_or(defaults.skip_kinds),
            allow_dangling_comments: file
                .allow_dangling_comments
                .unwrap_or(defaults.allow_dangling_comments),
        })
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    /// Whether objects in `namespace` are excluded from inspection.
    pub fn is_reserved(&self, namespace: &str) -> bool {
        self.reserved_namespaces.iter().any(|n| n == namespace)
            || self
                .reserved_prefixes
                .iter()
                .any(|prefix| namespace.starts_with(prefix.as_str()))
    }

    /// Whether rows of `kind` are excluded from inspection.
    pub fn skips(&self, kind: Kind) -> bool {
        self.skip_kinds.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reserved_namespaces() {
        let config = InspectConfig::default();
        assert!(config.is_reserved("pg_catalog"));
        assert!(config.is_reserved("information_schema"));
        assert!(config.is_reserved("pg_temp_3"));
        assert!(config.is_reserved("pg_toast_temp_3"));
        assert!(!config.is_reserved("public"));
        assert!(!config.is_reserved("pg_catalogue"));
    }

    #[test]
    fn test_from_json_defaults_missing_fields() {
        let config =
            InspectConfig::from_json(r#"{"skip_kinds": ["event-trigger", "role"]}"#).unwrap();
        assert_eq!(config.skip_kinds, vec![Kind::EventTrigger, Kind::Role]);
        assert_eq!(
            config.reserved_namespaces,
            InspectConfig::default().reserved_namespaces
        );
        assert!(!config.allow_dangling_comments);
        assert!(config.skips(Kind::Role));
        assert!(!config.skips(Kind::Relation));
    }

    #[test]
    fn test_from_json_overrides() {
        let config = InspectConfig::from_json(
            r#"{
                "reserved_namespaces": ["audit"],
                "reserved_prefixes": [],
                "allow_dangling_comments": true
            }"#,
        )
        .unwrap();
        assert!(config.is_reserved("audit"));
        assert!(!config.is_reserved("pg_catalog"));
        assert!(!config.is_reserved("pg_temp_1"));
        assert!(config.allow_dangling_comments);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = InspectConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
