use chrono::{DateTime, NaiveDate, Utc};
use pretty_assertions::assert_eq;
use stowage_codec::{CodecError, FieldType, StoredValue};
use stowage_fields::{FieldDecl, FieldError, FieldSet, MemoryRecord, StoreHost, StoreMap};

fn sample_set() -> FieldSet {
    FieldSet::declare(
        "options",
        [
            ("name", FieldDecl::typed(FieldType::String)),
            ("age", FieldDecl::typed(FieldType::Integer)),
            ("weight", FieldDecl::typed(FieldType::Float)),
            ("price", FieldDecl::typed(FieldType::Decimal)),
            ("built_at", FieldDecl::typed(FieldType::Time)),
            ("sold_on", FieldDecl::typed(FieldType::Date)),
            ("active", FieldDecl::typed(FieldType::Boolean)),
            ("tags", FieldDecl::typed(FieldType::Array)),
            (
                "color",
                FieldDecl::with_store_key(FieldType::String, "paint_color"),
            ),
        ],
    )
    .unwrap()
}

/// The raw stored text for a key under the `options` attribute.
fn raw(record: &impl StoreHost, key: &str) -> Option<String> {
    record.store("options").and_then(|map| map.get(key).cloned())
}

/// Host wrapper counting pre-mutation notifications.
#[derive(Debug, Default)]
struct CountingRecord {
    inner: MemoryRecord,
    notifications: usize,
}

impl StoreHost for CountingRecord {
    fn store(&self, attribute: &str) -> Option<StoreMap> {
        self.inner.store(attribute)
    }

    fn set_store(&mut self, attribute: &str, map: StoreMap) {
        self.inner.set_store(attribute, map);
    }

    fn store_will_change(&mut self, attribute: &str) {
        self.notifications += 1;
        self.inner.store_will_change(attribute);
    }

    fn store_change(&self, attribute: &str) -> Option<(StoreMap, StoreMap)> {
        self.inner.store_change(attribute)
    }
}

// ── Writing and reading ──────────────────────────────────────────

#[test]
fn set_stores_the_casted_encoding() {
    let fields = sample_set();
    let mut record = MemoryRecord::new();

    fields.set(&mut record, "age", "42").unwrap();
    assert_eq!(raw(&record, "age"), Some("42".to_string()));
    assert_eq!(
        fields.get(&record, "age").unwrap(),
        Some(StoredValue::Integer(42))
    );
    assert!(record.store_change("options").is_some());
}

#[test]
fn every_type_reads_back_its_canonical_value() {
    let fields = sample_set();
    let mut record = MemoryRecord::new();
    let built_at = DateTime::<Utc>::from_timestamp(1_714_557_600, 0).unwrap();
    let sold_on = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

    fields.set(&mut record, "name", "Gorby").unwrap();
    fields.set(&mut record, "age", "42").unwrap();
    fields.set(&mut record, "weight", "5.3").unwrap();
    fields.set(&mut record, "price", "1.50").unwrap();
    fields.set(&mut record, "built_at", built_at).unwrap();
    fields.set(&mut record, "sold_on", sold_on).unwrap();
    fields.set(&mut record, "active", "on").unwrap();
    fields.set(&mut record, "tags", vec!["new", "wooden"]).unwrap();

    let read = |name: &str| fields.get(&record, name).unwrap().unwrap();
    assert_eq!(read("name").as_text(), Some("Gorby"));
    assert_eq!(read("age").as_integer(), Some(42));
    assert_eq!(read("weight").as_float(), Some(5.3));
    assert_eq!(read("price").as_decimal(), Some("1.5"));
    assert_eq!(read("built_at").as_time(), Some(built_at));
    assert_eq!(read("sold_on").as_date(), Some(sold_on));
    assert_eq!(read("active").as_boolean(), Some(true));
    assert_eq!(
        read("tags").as_array(),
        Some(&[StoredValue::from("new"), StoredValue::from("wooden")][..])
    );

    // All fields of the set share the one backing attribute.
    assert_eq!(record.store("options").unwrap().len(), 8);
}

#[test]
fn repeated_equal_set_skips_the_notification() {
    let fields = sample_set();
    let mut record = CountingRecord::default();

    fields.set(&mut record, "tags", vec!["a", "b"]).unwrap();
    assert_eq!(record.notifications, 1);

    fields.set(&mut record, "tags", vec!["a", "b"]).unwrap();
    assert_eq!(record.notifications, 1, "equal write must not notify");

    fields.set(&mut record, "tags", vec!["c"]).unwrap();
    assert_eq!(record.notifications, 2);
}

#[test]
fn store_key_override_routes_the_map_entry() {
    let fields = sample_set();
    let mut record = MemoryRecord::new();

    fields.set(&mut record, "color", "red").unwrap();
    assert_eq!(raw(&record, "paint_color"), Some("red".to_string()));
    assert_eq!(raw(&record, "color"), None);
    assert_eq!(
        fields.get(&record, "color").unwrap(),
        Some(StoredValue::from("red"))
    );
}

#[test]
fn failed_cast_leaves_the_record_untouched() {
    let fields = sample_set();
    let mut record = MemoryRecord::new();
    fields.set(&mut record, "age", 42).unwrap();
    record.commit();

    let result = fields.set(&mut record, "age", "not a number");
    assert!(matches!(
        result,
        Err(FieldError::Codec(CodecError::InvalidValue { .. }))
    ));
    assert_eq!(raw(&record, "age"), Some("42".to_string()));
    assert_eq!(record.store_change("options"), None);
}

// ── Presence and clearing ────────────────────────────────────────

#[test]
fn presence_follows_blankness() {
    let fields = sample_set();
    let mut record = MemoryRecord::new();

    assert!(!fields.is_present(&record, "name").unwrap());

    fields.set(&mut record, "name", "  ").unwrap();
    assert!(!fields.is_present(&record, "name").unwrap());
    assert_eq!(
        fields.get(&record, "name").unwrap(),
        Some(StoredValue::from("  "))
    );

    fields.set(&mut record, "name", "Gorby").unwrap();
    assert!(fields.is_present(&record, "name").unwrap());

    fields.set(&mut record, "active", false).unwrap();
    assert!(!fields.is_present(&record, "active").unwrap());

    fields.set(&mut record, "tags", Vec::<StoredValue>::new()).unwrap();
    assert!(!fields.is_present(&record, "tags").unwrap());

    fields.set(&mut record, "age", 0).unwrap();
    assert!(fields.is_present(&record, "age").unwrap());
}

#[test]
fn clear_removes_the_entry_and_spares_siblings() {
    let fields = sample_set();
    let mut record = CountingRecord::default();

    fields.set(&mut record, "age", 42).unwrap();
    fields.set(&mut record, "name", "Gorby").unwrap();
    assert_eq!(record.notifications, 2);

    fields.clear(&mut record, "age").unwrap();
    assert_eq!(record.notifications, 3);
    assert_eq!(raw(&record, "age"), None);
    assert_eq!(raw(&record, "name"), Some("Gorby".to_string()));
    assert_eq!(fields.get(&record, "age").unwrap(), None);

    // Clearing an absent field is a no-op.
    fields.clear(&mut record, "age").unwrap();
    assert_eq!(record.notifications, 3);
}

// ── Host interaction ─────────────────────────────────────────────

#[test]
fn host_map_copies_are_isolated() {
    let fields = sample_set();
    let mut record = MemoryRecord::new();
    fields.set(&mut record, "age", 42).unwrap();

    let mut copy = record.store("options").unwrap();
    copy.insert("age".to_string(), "999".to_string());

    assert_eq!(
        fields.get(&record, "age").unwrap(),
        Some(StoredValue::Integer(42))
    );
}

#[test]
fn corrupt_stored_text_reads_as_absent() {
    let fields = sample_set();
    let mut record = MemoryRecord::new();
    record.set_store(
        "options",
        StoreMap::from([
            ("age".to_string(), "garbage".to_string()),
            ("name".to_string(), "still fine".to_string()),
        ]),
    );

    assert_eq!(fields.get(&record, "age").unwrap(), None);
    assert!(!fields.is_present(&record, "age").unwrap());
    // A corrupt sibling does not poison other fields.
    assert_eq!(
        fields.get(&record, "name").unwrap(),
        Some(StoredValue::from("still fine"))
    );
}

#[test]
fn attributes_are_independent() {
    let options = sample_set();
    let extras = FieldSet::declare("extras", [("note", FieldDecl::typed(FieldType::String))])
        .unwrap();
    let mut record = MemoryRecord::new();

    options.set(&mut record, "age", 42).unwrap();
    extras.set(&mut record, "note", "aside").unwrap();

    assert_eq!(record.store("options").unwrap().len(), 1);
    assert_eq!(record.store("extras").unwrap().len(), 1);
    assert_eq!(
        extras.get(&record, "note").unwrap(),
        Some(StoredValue::from("aside"))
    );
}

#[test]
fn convenience_dispatch_rejects_unknown_fields() {
    let fields = sample_set();
    let mut record = MemoryRecord::new();

    assert_eq!(
        fields.get(&record, "missing").unwrap_err(),
        FieldError::UnknownField("missing".to_string())
    );
    assert!(fields.set(&mut record, "missing", 1).is_err());
    assert!(fields.is_present(&record, "missing").is_err());
}
