use super::*;
use crate::{
    db::query::{QueryOptions, SortDirective},
    error::ErrorClass,
    key::KeyRange,
    obs::sink::test_support::RecordingSink,
    value::Value,
};
use std::rc::Rc;

fn user(id: i64, name: &str) -> Value {
    Value::map([("id", Value::Int(id)), ("name", Value::from(name))])
}

fn natural() -> Store<NaturalStore> {
    Store::natural(StoreConfig::new("users").with_key_path("id"))
}

fn indexed() -> Store<IndexedStore> {
    Store::indexed(StoreConfig::new("users").with_key_path("id"))
}

#[test]
fn round_trip_by_resolved_key() {
    let mut store = natural();
    let value = user(7, "ada");
    let key = store.put(value.clone()).unwrap();

    let location = store.locate(&KeySelector::Key(key));
    assert!(location.found());
    assert_eq!(location.value(), Some(&value));
}

#[test]
fn records_stay_physically_ordered() {
    let mut store = natural();
    for id in [5, 1, 9, 3] {
        store.put(user(id, "x")).unwrap();
    }

    let keys: Vec<&Key> = store.records().iter().map(Record::key).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn add_rejects_duplicate_key_and_put_overwrites() {
    let mut store = natural();
    store.add(user(1, "first")).unwrap();

    let err = store.add(user(1, "second")).unwrap_err();
    assert_eq!(err.class, ErrorClass::Conflict);
    assert_eq!(store.len(), 1);
    assert_eq!(
        store.get(&KeySelector::Key(Key::from(1))),
        Some(&user(1, "first"))
    );

    store.put(user(1, "second")).unwrap();
    assert_eq!(store.len(), 1, "overwrite replaces, never duplicates");
    assert_eq!(
        store.get(&KeySelector::Key(Key::from(1))),
        Some(&user(1, "second"))
    );
}

#[test]
fn explicit_key_wins_over_key_path() {
    let mut store = natural();
    let key = store
        .put_with(
            user(1, "ada"),
            PutOptions::new().with_key(Key::from("custom")),
            Tags::new(),
        )
        .unwrap();

    assert_eq!(key, Key::from("custom"));
    assert!(store.get(&KeySelector::Key(Key::from("custom"))).is_some());
}

#[test]
fn missing_key_is_a_missing_parameter() {
    let mut store = Store::natural(StoreConfig::new("anon"));
    let err = store.put(user(1, "ada")).unwrap_err();
    assert_eq!(err.class, ErrorClass::MissingParameter);
}

#[test]
fn key_path_absent_on_value_is_a_data_error() {
    let mut store = natural();
    let err = store.put(Value::map([("other", Value::Int(1))])).unwrap_err();
    assert_eq!(err.class, ErrorClass::Data);
}

#[test]
fn remove_by_key_and_by_range() {
    let mut store = natural();
    for id in 1..=5 {
        store.put(user(id, "x")).unwrap();
    }

    assert!(store.remove(&KeySelector::Key(Key::from(3))).unwrap());
    assert!(!store.remove(&KeySelector::Key(Key::from(3))).unwrap());

    let range = KeyRange::new(Some(Key::from(2)), Some(Key::from(4)), false, false).unwrap();
    assert!(store.remove(&KeySelector::Range(range.clone())).unwrap());
    assert!(!store.remove(&KeySelector::Range(range)).unwrap(), "zero matches is not a failure");

    let remaining: Vec<&Key> = store.records().iter().map(Record::key).collect();
    assert_eq!(remaining, vec![&Key::from(1), &Key::from(5)]);
}

#[test]
fn clear_twice_is_idempotent() {
    let mut store = natural();
    store.put(user(1, "a")).unwrap();
    store.put(user(2, "b")).unwrap();

    assert_eq!(store.clear().unwrap().len(), 2);
    assert_eq!(store.clear().unwrap().len(), 0);
    assert!(store.is_empty());
}

#[test]
fn query_sorts_and_paginates_store_payloads() {
    let mut store = natural();
    for (id, name) in [(1, "carol"), (2, "alice"), (3, "bob")] {
        store.put(user(id, name)).unwrap();
    }

    let rows = store
        .query(
            &QueryOptions::new()
                .sort_by(vec![SortDirective::new("name")])
                .start(1)
                .count(1),
        )
        .unwrap();

    assert_eq!(rows, vec![user(3, "bob")]);
}

#[test]
fn unique_index_rejects_collision_without_partial_insert() {
    let mut store = indexed();
    store
        .create_index(IndexModel::new("by_name", "name").unique())
        .unwrap();

    store.put(user(1, "ada")).unwrap();
    let err = store.put(user(2, "ada")).unwrap_err();
    assert_eq!(err.class, ErrorClass::Conflict);

    // The failed record reached neither the primary sequence nor the index.
    assert_eq!(store.len(), 1);
    let matched = store
        .index_lookup("by_name", &KeySelector::Key(Key::from("ada")))
        .unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].key(), &Key::from(1));
}

#[test]
fn unique_index_allows_overwriting_the_owner() {
    let mut store = indexed();
    store
        .create_index(IndexModel::new("by_name", "name").unique())
        .unwrap();

    store.put(user(1, "ada")).unwrap();
    store.put(user(1, "ada")).unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn index_tracks_overwrites_and_deletes() {
    let mut store = indexed();
    store.create_index(IndexModel::new("by_name", "name")).unwrap();

    store.put(user(1, "ada")).unwrap();
    store.put(user(1, "grace")).unwrap();

    assert!(
        store
            .index_lookup("by_name", &KeySelector::Key(Key::from("ada")))
            .unwrap()
            .is_empty(),
        "stale entry removed on overwrite"
    );
    assert_eq!(
        store
            .index_lookup("by_name", &KeySelector::Key(Key::from("grace")))
            .unwrap()
            .len(),
        1
    );

    store.remove(&KeySelector::Key(Key::from(1))).unwrap();
    assert!(
        store
            .index_lookup("by_name", &KeySelector::Key(Key::from("grace")))
            .unwrap()
            .is_empty(),
        "entries never dangle past their record"
    );
}

#[test]
fn multi_entry_index_expands_list_extractions() {
    let mut store = indexed();
    store
        .create_index(IndexModel::new("by_tag", "tags").multi_entry())
        .unwrap();

    let value = Value::map([
        ("id", Value::Int(1)),
        (
            "tags",
            Value::List(vec![Value::from("red"), Value::from("blue")]),
        ),
    ]);
    store.put(value).unwrap();

    for tag in ["red", "blue"] {
        let matched = store
            .index_lookup("by_tag", &KeySelector::Key(Key::from(tag)))
            .unwrap();
        assert_eq!(matched.len(), 1, "tag {tag} should address the record");
    }
}

#[test]
fn multi_entry_unique_checks_every_element() {
    let mut store = indexed();
    store
        .create_index(IndexModel::new("by_tag", "tags").unique().multi_entry())
        .unwrap();

    store
        .put(Value::map([
            ("id", Value::Int(1)),
            ("tags", Value::List(vec![Value::from("red")])),
        ]))
        .unwrap();

    let err = store
        .put(Value::map([
            ("id", Value::Int(2)),
            (
                "tags",
                Value::List(vec![Value::from("green"), Value::from("red")]),
            ),
        ]))
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::Conflict);

    assert!(
        store
            .index_lookup("by_tag", &KeySelector::Key(Key::from("green")))
            .unwrap()
            .is_empty(),
        "no element of the rejected record was indexed"
    );
}

#[test]
fn create_index_over_existing_data_validates_uniqueness() {
    let mut store = indexed();
    store.put(user(1, "ada")).unwrap();
    store.put(user(2, "ada")).unwrap();

    let err = store
        .create_index(IndexModel::new("by_name", "name").unique())
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::Conflict);
    assert!(store.index("by_name").is_none(), "nothing was installed");

    store.create_index(IndexModel::new("by_name", "name")).unwrap();
    assert_eq!(
        store
            .index_lookup("by_name", &KeySelector::Key(Key::from("ada")))
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn delete_index_leaves_records_alone() {
    let mut store = indexed();
    store.create_index(IndexModel::new("by_name", "name")).unwrap();
    store.put(user(1, "ada")).unwrap();

    let model = store.delete_index("by_name").unwrap();
    assert_eq!(model.key_path, "name");
    assert_eq!(store.len(), 1);

    let err = store.delete_index("by_name").unwrap_err();
    assert_eq!(err.class, ErrorClass::NotFound);
}

#[test]
fn change_events_fire_for_successful_mutations_only() {
    let sink = Rc::new(RecordingSink::default());
    let mut store = Store::indexed(
        StoreConfig::new("users")
            .with_key_path("id")
            .with_sink(sink.clone()),
    );
    store
        .create_index(IndexModel::new("by_name", "name").unique())
        .unwrap();

    store.put(user(1, "ada")).unwrap();
    store.put(user(1, "grace")).unwrap();
    store.put(user(2, "ada")).unwrap();
    let _ = store.put(user(3, "ada")).unwrap_err();
    store.remove(&KeySelector::Key(Key::from(2))).unwrap();
    store.clear().unwrap();

    use crate::db::txn::Opcode;
    assert_eq!(
        sink.opcodes(),
        vec![
            Opcode::New,
            Opcode::Update,
            Opcode::New,
            Opcode::Delete,
            Opcode::Clear,
        ]
    );

    let events = sink.events.borrow();
    assert_eq!(events[3].key, Key::from(2));
    assert_eq!(events[3].value, user(2, "ada"));
}
