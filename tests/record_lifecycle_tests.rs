use recbase::{Entity, MemoryStore, QueryExecutor, Record, RecordError, Row, Session, Value};

struct Customer;

impl Entity for Customer {
    const TABLE: &'static str = "customers";
    const PRIMARY_KEY: &'static str = "customer_id";
    const FIELDS: &'static [&'static str] =
        &["customer_id", "phone", "email", "first", "last"];
}

/// Entity whose post-load hook always rejects
struct Guarded;

impl Entity for Guarded {
    const TABLE: &'static str = "guarded";
    const PRIMARY_KEY: &'static str = "guarded_id";
    const FIELDS: &'static [&'static str] = &["guarded_id", "email"];

    fn post_load(_record: &mut Record<Self>) -> bool {
        false
    }
}

fn session() -> Session<MemoryStore> {
    let mut store = MemoryStore::new();
    store.create_table("customers", "customer_id").unwrap();
    store.create_table("guarded", "guarded_id").unwrap();
    Session::new(store)
}

fn seed_customer(session: &mut Session<MemoryStore>) -> i64 {
    let row = Row::from([
        ("phone".to_string(), Value::Text("555.123.4567".into())),
        ("email".to_string(), Value::Text("A@B.COM".into())),
        ("first".to_string(), Value::Text("john".into())),
        ("last".to_string(), Value::Text("o-brien".into())),
    ]);
    session.store_mut().insert("customers", &row).unwrap()
}

#[test]
fn test_new_record_is_null_and_unloaded() {
    let record = Record::<Customer>::new();
    assert!(!record.loaded());
    assert_eq!(record.id(), &Value::Null);
    assert_eq!(record.display_name(), None);
    assert_eq!(record.json_snapshot(), None);
    for field in Customer::FIELDS {
        assert_eq!(record.get(field), Some(&Value::Null), "field {field}");
    }
}

#[test]
fn test_load_by_id_populates_and_normalizes() {
    let mut session = session();
    let id = seed_customer(&mut session);

    let record = Record::<Customer>::fetch(&mut session, id).unwrap();
    assert!(record.loaded());
    assert_eq!(record.id().as_i64(), Some(id));
    assert_eq!(record.get("phone"), Some(&Value::Text("(555) 123-4567".into())));
    assert_eq!(record.get("email"), Some(&Value::Text("a@b.com".into())));
    assert_eq!(record.get("first"), Some(&Value::Text("John".into())));
    assert_eq!(record.get("last"), Some(&Value::Text("O-Brien".into())));
    assert_eq!(record.display_name(), Some("John O-Brien"));

    let snapshot = record.json_snapshot().unwrap();
    assert!(snapshot.contains("&quot;email&quot;:&quot;a@b.com&quot;"));
    assert!(snapshot.contains("(555) 123-4567"));
    assert!(!snapshot.contains('"'));
}

#[test]
fn test_load_missing_id_fails_and_stays_unloaded() {
    let mut session = session();
    let mut record = Record::<Customer>::new();

    let err = record.load(&mut session, 999).unwrap_err();
    assert!(matches!(err, RecordError::NotFound(_)));
    assert!(!record.loaded());
}

#[test]
fn test_load_by_predicate() {
    let mut session = session();
    let id = seed_customer(&mut session);

    let criteria =
        recbase::LoadCriteria::matching([("email", Value::Text("A@B.COM".into()))]);
    let record = Record::<Customer>::fetch(&mut session, criteria).unwrap();
    assert!(record.loaded());
    assert_eq!(record.id().as_i64(), Some(id));
}

#[test]
fn test_load_twice_has_cache_parity() {
    let mut session = session();
    let id = seed_customer(&mut session);

    let first = Record::<Customer>::fetch(&mut session, id).unwrap();
    let first_fields = first.fields().clone();

    // Remove the backing row: the second load can only come from the cache
    let predicate =
        recbase::Predicate::from([("customer_id".to_string(), Value::Integer(id))]);
    session
        .store_mut()
        .delete("customers", &predicate)
        .unwrap();

    let second = Record::<Customer>::fetch(&mut session, id).unwrap();
    assert!(second.loaded());
    assert_eq!(second.fields(), &first_fields);
    assert_eq!(second.display_name(), Some("John O-Brien"));
}

#[test]
fn test_save_inserts_when_primary_key_is_null() {
    let mut session = session();
    let mut record = Record::<Customer>::new();
    record.set("email", "new@example.com").unwrap();

    record.save(&mut session).unwrap();

    let id = record.get("customer_id").unwrap().as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(session.store().row_count("customers").unwrap(), 1);

    // A second save must now update, not insert again
    record.set("email", "changed@example.com").unwrap();
    record.save(&mut session).unwrap();
    assert_eq!(session.store().row_count("customers").unwrap(), 1);

    let predicate =
        recbase::Predicate::from([("customer_id".to_string(), Value::Integer(id))]);
    let rows = session.store().query("customers", &predicate, 1).unwrap();
    assert_eq!(
        rows[0].get("email"),
        Some(&Value::Text("changed@example.com".into()))
    );
}

#[test]
fn test_save_with_positive_key_issues_no_insert() {
    let mut session = session();
    let mut record = Record::<Customer>::new();
    record.set("customer_id", 42i64).unwrap();
    record.set("email", "nobody@example.com").unwrap();

    // No row 42 exists; an update matches nothing and nothing is inserted
    record.save(&mut session).unwrap();
    assert_eq!(session.store().row_count("customers").unwrap(), 0);
    assert_eq!(record.get("customer_id"), Some(&Value::Integer(42)));
}

#[test]
fn test_save_writes_nulls_as_empty_strings() {
    let mut session = session();
    let mut record = Record::<Customer>::new();
    record.set("email", "only@example.com").unwrap();
    record.save(&mut session).unwrap();

    let id = record.get("customer_id").unwrap().as_i64().unwrap();
    let predicate =
        recbase::Predicate::from([("customer_id".to_string(), Value::Integer(id))]);
    let rows = session.store().query("customers", &predicate, 1).unwrap();
    assert_eq!(rows[0].get("phone"), Some(&Value::Text(String::new())));
    assert_eq!(rows[0].get("first"), Some(&Value::Text(String::new())));
}

#[test]
fn test_delete_clears_key_but_cache_survives() {
    let mut session = session();
    let id = seed_customer(&mut session);

    let mut record = Record::<Customer>::fetch(&mut session, id).unwrap();
    record.delete(&mut session).unwrap();

    assert_eq!(record.get("customer_id"), Some(&Value::Null));
    assert_eq!(session.store().row_count("customers").unwrap(), 0);

    // Documented limitation: the cache entry outlives the row
    let stale = Record::<Customer>::fetch(&mut session, id).unwrap();
    assert!(stale.loaded());
    assert_eq!(stale.get("email"), Some(&Value::Text("a@b.com".into())));
}

#[test]
fn test_hook_rejection_keeps_partial_mutation() {
    let mut session = session();
    let row = Row::from([("email".to_string(), Value::Text("X@Y.COM".into()))]);
    let id = session.store_mut().insert("guarded", &row).unwrap();

    let mut record = Record::<Guarded>::new();
    let err = record.load(&mut session, id).unwrap_err();
    assert!(matches!(err, RecordError::HookRejected(_)));

    // The documented quirk: loaded and the copied fields stand, but no
    // snapshot was computed
    assert!(record.loaded());
    assert_eq!(record.get("email"), Some(&Value::Text("x@y.com".into())));
    assert_eq!(record.json_snapshot(), None);
}

#[test]
fn test_set_rejects_undeclared_fields() {
    let mut record = Record::<Customer>::new();
    let err = record.set("nickname", "joJo").unwrap_err();
    assert!(matches!(err, RecordError::UnknownField(_, _)));
    assert_eq!(record.get("nickname"), None);
}

#[test]
fn test_populate_leaves_absent_fields_unchanged() {
    let mut session = session();
    let mut record = Record::<Customer>::new();

    let partial = Row::from([("email".to_string(), Value::Text("a@b.com".into()))]);
    record.populate(&mut session, &partial).unwrap();
    assert_eq!(record.get("email"), Some(&Value::Text("a@b.com".into())));

    // A second populate without the email column keeps the stale value
    let other = Row::from([("first".to_string(), Value::Text("ann".into()))]);
    record.populate(&mut session, &other).unwrap();
    assert_eq!(record.get("email"), Some(&Value::Text("a@b.com".into())));
    assert_eq!(record.get("first"), Some(&Value::Text("ann".into())));
}

#[test]
fn test_descriptor_reflects_entity() {
    let descriptor = Record::<Customer>::descriptor();
    assert_eq!(descriptor.table, "customers");
    assert_eq!(descriptor.primary_key, "customer_id");
    assert_eq!(descriptor.fields.len(), 5);
}
