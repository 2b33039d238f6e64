use super::*;

fn make_namespace_attributes(owner: &str) -> Attributes {
    Attributes::new()
        .with("owner", owner)
        .with("acl", Value::Absent)
}

#[test]
fn test_kind_order_matches_tag_order() {
    let mut by_tag = Kind::ALL.to_vec();
    by_tag.sort_by_key(|k| k.tag());
    let mut by_ord = Kind::ALL.to_vec();
    by_ord.sort();
    assert_eq!(by_tag, by_ord);
    assert_eq!(by_ord, Kind::ALL.to_vec());
}

#[test]
fn test_kind_lookup_round_trips() {
    for kind in Kind::ALL {
        assert_eq!(Kind::from_tag(kind.tag()), Some(kind));
        assert_eq!(Kind::from_catalog(kind.catalog()), Some(kind));
    }
    assert_eq!(Kind::from_catalog("pg_index"), None);
    assert_eq!(Kind::from_tag("table"), None);
}

#[test]
fn test_every_kind_has_unique_attribute_names() {
    for kind in Kind::ALL {
        let schema = kind.schema();
        assert!(!schema.is_empty(), "{kind} has an empty schema");
        for (i, spec) in schema.iter().enumerate() {
            assert!(
                schema[i + 1..].iter().all(|other| other.name != spec.name),
                "{kind} declares `{}` twice",
                spec.name
            );
        }
    }
}

#[test]
fn test_global_kinds_have_no_namespace() {
    let global: Vec<_> = Kind::ALL.into_iter().filter(|k| !k.has_namespace()).collect();
    assert_eq!(
        global,
        [Kind::Cast, Kind::Database, Kind::EventTrigger, Kind::Namespace, Kind::Role]
    );
}

#[test]
fn test_identity_order() {
    let a = Identity::new(Kind::Column, "public", "test.id");
    let b = Identity::new(Kind::Relation, "aaa", "zzz");
    let c = Identity::new(Kind::Relation, "public", "aaa");
    let d = Identity::new(Kind::Relation, "public", "test");
    let mut ids = vec![d.clone(), b.clone(), c.clone(), a.clone()];
    ids.sort();
    assert_eq!(ids, vec![a, b, c, d]);
}

#[test]
fn test_identity_display() {
    assert_eq!(
        Identity::new(Kind::Relation, "public", "test").to_string(),
        "relation public.test"
    );
    assert_eq!(Identity::new(Kind::Role, "", "alice").to_string(), "role alice");
    assert_eq!(
        Identity::new(Kind::Cast, "", "text -> integer").to_string(),
        "cast text -> integer"
    );
}

#[test]
fn test_absent_and_not_applicable_are_distinct() {
    assert_ne!(Value::Absent, Value::NotApplicable);
    assert_ne!(Value::Absent, Value::Bool(false));
    assert_ne!(Value::Absent, Value::Text(String::new()));
    assert_ne!(Value::NotApplicable, Value::Text("-".into()));
    assert_ne!(Value::Int(0), Value::Bool(false));
}

#[test]
fn test_list_is_order_sensitive() {
    assert_ne!(Value::list(["a", "b"]), Value::list(["b", "a"]));
    assert_eq!(Value::list(["a", "b"]), Value::list(["a", "b"]));
}

#[test]
fn test_set_is_order_insensitive() {
    assert_eq!(Value::set(["b", "a"]), Value::set(["a", "b"]));
    assert_eq!(Value::set(["a", "a", "b"]), Value::set(["b", "a"]));
    // Sets built by hand, bypassing normalization, still compare as sets.
    assert_eq!(
        Value::Set(vec!["b".into(), "a".into()]),
        Value::Set(vec!["a".into(), "b".into()])
    );
    assert_ne!(Value::set(["a"]), Value::list(["a"]));
}

#[test]
fn test_value_from_option() {
    assert_eq!(Value::from(None::<String>), Value::Absent);
    assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
}

#[test]
fn test_value_display() {
    assert_eq!(Value::Absent.to_string(), "null");
    assert_eq!(Value::NotApplicable.to_string(), "-");
    assert_eq!(Value::from("text").to_string(), "\"text\"");
    assert_eq!(Value::list(["a", "b"]).to_string(), "[\"a\", \"b\"]");
    assert_eq!(Value::set(["b", "a"]).to_string(), "{\"a\", \"b\"}");
}

#[test]
fn test_record_reorders_to_schema_order() {
    let attrs = Attributes::new()
        .with("acl", Value::Absent)
        .with("owner", "postgres");
    let record = Record::new(Kind::Namespace, "", "app", attrs).unwrap();
    let names: Vec<&str> = record.attributes().names().collect();
    assert_eq!(names, vec!["owner", "acl"]);
}

#[test]
fn test_record_rejects_missing_attribute() {
    let attrs = Attributes::new().with("owner", "postgres");
    let err = Record::new(Kind::Namespace, "", "app", attrs).unwrap_err();
    assert!(matches!(
        err,
        SchemaViolation::MissingAttribute {
            kind: Kind::Namespace,
            ref attribute,
        } if attribute == "acl"
    ));
}

#[test]
fn test_record_rejects_unknown_attribute() {
    let attrs = make_namespace_attributes("postgres").with("comment", "hello");
    let err = Record::new(Kind::Namespace, "", "app", attrs).unwrap_err();
    assert_eq!(err.attribute(), "comment");
    assert!(matches!(err, SchemaViolation::UnknownAttribute { .. }));
}

#[test]
fn test_record_rejects_null_on_required_attribute() {
    let attrs = Attributes::new()
        .with("owner", Value::Absent)
        .with("acl", Value::Absent);
    let err = Record::new(Kind::Namespace, "", "app", attrs).unwrap_err();
    assert!(matches!(
        err,
        SchemaViolation::IllegalSentinel { sentinel: "null", .. }
    ));
}

#[test]
fn test_record_rejects_not_applicable_on_non_reference() {
    let attrs = Attributes::new()
        .with("target", Value::NotApplicable)
        .with("object", "test")
        .with("column", Value::Absent)
        .with("description", "a table");
    let err = Record::new(Kind::Description, "public", "test a table", attrs).unwrap_err();
    assert!(matches!(
        err,
        SchemaViolation::IllegalSentinel { sentinel: "not-applicable", .. }
    ));
}

#[test]
fn test_record_accepts_not_applicable_reference() {
    let attrs = Attributes::new()
        .with("owner", Value::NotApplicable)
        .with("acl", Value::Absent);
    assert!(Record::new(Kind::Namespace, "", "app", attrs).is_ok());
}

#[test]
fn test_record_rejects_wrong_collection_type() {
    let attrs = Attributes::new()
        .with("owner", "postgres")
        .with("acl", Value::list(["postgres=UC/postgres"]));
    let err = Record::new(Kind::Namespace, "", "app", attrs).unwrap_err();
    assert!(matches!(
        err,
        SchemaViolation::TypeMismatch {
            expected: AttrType::Set,
            found: "list",
            ..
        }
    ));
}

#[test]
fn test_record_rejects_non_text_set_element() {
    let attrs = Attributes::new()
        .with("owner", "postgres")
        .with("acl", Value::set([Value::Int(1)]));
    assert!(Record::new(Kind::Namespace, "", "app", attrs).is_err());
}

#[test]
fn test_attributes_equality_ignores_order() {
    let a = Attributes::new().with("x", 1i64).with("y", true);
    let b = Attributes::new().with("y", true).with("x", 1i64);
    assert_eq!(a, b);
}
