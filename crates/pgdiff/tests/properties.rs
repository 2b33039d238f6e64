//! Algebraic laws of `diff`.

use pgdiff::{Attributes, Classification, Kind, Record, Snapshot, Value, diff};
use proptest::prelude::*;
use std::collections::BTreeMap;

type Schemas = BTreeMap<String, (Value, Value)>;
type Sequences = BTreeMap<String, (i64, bool)>;

fn owner() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::NotApplicable),
        "[a-c]".prop_map(Value::Text),
    ]
}

fn acl() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Absent),
        prop::collection::vec("[a-c]=U/[a-c]", 0..3).prop_map(Value::set),
    ]
}

fn fixture() -> impl Strategy<Value = (Schemas, Sequences)> {
    (
        prop::collection::btree_map("[a-d]{1,2}", (owner(), acl()), 0..6),
        prop::collection::btree_map("[a-d]{1,2}", (1i64..4, any::<bool>()), 0..6),
    )
}

fn make_schema(name: String, owner: Value, acl: Value) -> Record {
    Record::new(
        Kind::Namespace,
        "",
        name,
        Attributes::new().with("owner", owner).with("acl", acl),
    )
    .unwrap()
}

fn make_sequence(name: String, increment: i64, cycled: bool) -> Record {
    Record::new(
        Kind::Sequence,
        "public",
        name,
        Attributes::new()
            .with("type", "bigint")
            .with("start", 1i64)
            .with("increment", increment)
            .with("maxValue", i64::MAX)
            .with("minValue", 1i64)
            .with("cacheValue", 1i64)
            .with("isCycled", cycled),
    )
    .unwrap()
}

fn make_records(prefix: &str, (schemas, sequences): (Schemas, Sequences)) -> Vec<Record> {
    let schemas = schemas
        .into_iter()
        .map(|(name, (owner, acl))| make_schema(format!("{prefix}{name}"), owner, acl));
    let sequences = sequences.into_iter().map(|(name, (increment, cycled))| {
        make_sequence(format!("{prefix}{name}"), increment, cycled)
    });
    schemas.chain(sequences).collect()
}

fn make_snapshot(records: Vec<Record>) -> Snapshot {
    Snapshot::new(records).unwrap()
}

proptest! {
    #[test]
    fn test_diff_with_itself_is_empty(fixture in fixture()) {
        let snapshot = make_snapshot(make_records("", fixture));
        prop_assert!(diff(&snapshot, &snapshot).is_empty());
    }

    #[test]
    fn test_disjoint_snapshots_add_and_remove_everything(a in fixture(), b in fixture()) {
        let a = make_snapshot(make_records("a_", a));
        let b = make_snapshot(make_records("b_", b));

        let forward = diff(&a, &b);
        let summary = forward.summary();
        prop_assert_eq!(summary.removed, a.len());
        prop_assert_eq!(summary.added, b.len());
        prop_assert_eq!(summary.modified, 0);

        let backward = diff(&b, &a);
        prop_assert_eq!(forward.reversed(), backward);
    }

    #[test]
    fn test_delta_is_minimal(a in fixture(), b in fixture()) {
        let a = make_snapshot(make_records("", a));
        let b = make_snapshot(make_records("", b));

        for change in diff(&a, &b).iter() {
            if change.classification != Classification::Modified {
                prop_assert!(change.delta.is_none());
                continue;
            }
            let before = change.before.as_ref().unwrap();
            let after = change.after.as_ref().unwrap();
            let delta = change.delta.as_ref().unwrap();
            prop_assert!(!delta.is_empty());

            for (name, old, new) in delta.iter() {
                prop_assert_ne!(old, new);
                prop_assert_eq!(before.get(name), Some(old));
                prop_assert_eq!(after.get(name), Some(new));
            }
            for (name, value) in before.iter() {
                if !delta.contains(name) {
                    prop_assert_eq!(after.get(name), Some(value));
                }
            }
        }
    }

    #[test]
    fn test_diff_is_reversible(a in fixture(), b in fixture()) {
        let a = make_snapshot(make_records("", a));
        let b = make_snapshot(make_records("", b));
        prop_assert_eq!(diff(&a, &b).reversed(), diff(&b, &a));
    }

    #[test]
    fn test_output_order_ignores_input_order(
        (records, shuffled) in fixture()
            .prop_map(|fixture| make_records("", fixture))
            .prop_flat_map(|records| (Just(records.clone()), Just(records).prop_shuffle())),
        other in fixture(),
    ) {
        let before = make_snapshot(make_records("", other));
        let ordered = diff(&before, &make_snapshot(records));
        let permuted = diff(&before, &make_snapshot(shuffled));

        prop_assert_eq!(ordered.to_string(), permuted.to_string());
        prop_assert_eq!(ordered.to_json().unwrap(), permuted.to_json().unwrap());

        let identities: Vec<_> = ordered.iter().map(|c| c.identity.clone()).collect();
        let mut sorted = identities.clone();
        sorted.sort();
        prop_assert_eq!(identities, sorted);
    }
}
