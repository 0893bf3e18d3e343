//! Serializer Round-Trip Tests
//!
//! Tests for mapping / JSON / file conversion:
//! - Unfiltered round trip reproduces the object
//! - only / ignore filters on both directions, including whole subtrees
//! - Custom values decode in place
//! - Validation rejects extra and missing fields without touching the object
//! - Lists of objects load into fresh element instances

use serde_json::{json, Value};
use tempfile::TempDir;
use versioned_obj::value::{CustomValue, DecodeError, FieldValue, Mapping};
use versioned_obj::{ObjError, ObjectInstance, PathFilter, Schema, Serializer, SerializerConfig};

// =============================================================================
// Helper Functions
// =============================================================================

fn nested_schema() -> Schema {
    Schema::builder("NestedConfig")
        .field("var1", "hello")
        .field("var2", 55.5)
        .build()
        .unwrap()
}

fn test_schema() -> Schema {
    Schema::builder("TestConfig")
        .field("var1", 4)
        .nested("var2", &nested_schema())
        .field("var3", true)
        .build()
        .unwrap()
}

fn mapping(value: Value) -> Mapping {
    match value {
        Value::Object(map) => map,
        _ => panic!("fixture must be an object"),
    }
}

fn scalar(obj: &ObjectInstance, path: &str) -> Value {
    obj.get(path).unwrap().as_scalar().unwrap().clone()
}

#[derive(Debug, Clone, PartialEq)]
struct Triple {
    a: i64,
    b: i64,
    c: i64,
}

impl CustomValue for Triple {
    fn encode(&self) -> Value {
        json!(format!("{}:{}:{}", self.a, self.b, self.c))
    }

    fn decode(&mut self, value: &Value) -> Result<(), DecodeError> {
        let text = value.as_str().ok_or_else(|| DecodeError::new("expected a string"))?;
        let parts = text
            .split(':')
            .map(|p| p.parse::<i64>().map_err(|e| DecodeError::new(e.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        match parts.as_slice() {
            [a, b, c] => {
                self.a = *a;
                self.b = *b;
                self.c = *c;
                Ok(())
            }
            _ => Err(DecodeError::new("expected three fields")),
        }
    }
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_round_trip_restores_changed_values() {
    let ser = Serializer::new();
    let mut obj = test_schema().instantiate().unwrap();
    let saved = ser.to_mapping(&obj, &PathFilter::all());

    obj.set("var1", json!(100)).unwrap();
    obj.set("var2.var1", json!("changed")).unwrap();

    let result = ser.from_mapping(&mut obj, &saved, &PathFilter::all(), true).unwrap();
    assert!(result.is_none());
    assert_eq!(obj, test_schema().instantiate().unwrap());
}

#[test]
fn test_to_mapping_is_idempotent() {
    let ser = Serializer::new();
    let obj = test_schema().instantiate().unwrap();
    let first = ser.to_mapping(&obj, &PathFilter::all());

    let (loaded, _) = ser
        .new_from_mapping(&test_schema(), &first, &PathFilter::all(), true)
        .unwrap();
    assert_eq!(ser.to_mapping(&loaded, &PathFilter::all()), first);
    assert_eq!(
        Value::Object(first),
        json!({"var1": 4, "var3": true, "var2": {"var1": "hello", "var2": 55.5}})
    );
}

#[test]
fn test_loading_same_mapping_twice_gives_same_state() {
    let ser = Serializer::new();
    let data = mapping(json!({"var1": 9, "var3": false, "var2": {"var1": "again", "var2": 1.5}}));
    let mut obj = test_schema().instantiate().unwrap();

    ser.from_mapping(&mut obj, &data, &PathFilter::all(), true).unwrap();
    let once = obj.clone();
    ser.from_mapping(&mut obj, &data, &PathFilter::all(), true).unwrap();

    assert_eq!(obj, once);
    assert_eq!(scalar(&obj, "var2.var1"), json!("again"));
}

#[test]
fn test_version_key_is_not_loaded() {
    let schema = Schema::builder("V").version("2.0").field("a", 1).build().unwrap();
    let ser = Serializer::new();
    let mut obj = schema.instantiate().unwrap();

    ser.from_mapping(&mut obj, &mapping(json!({"version": "2.0", "a": 5})), &PathFilter::all(), true)
        .unwrap();
    assert_eq!(scalar(&obj, "a"), json!(5));
    assert_eq!(obj.version().as_deref(), Some("2.0"));
}

// =============================================================================
// Filter Tests
// =============================================================================

#[test]
fn test_to_mapping_only_subfields() {
    let obj = test_schema().instantiate().unwrap();
    let d = Serializer::new().to_mapping(&obj, &PathFilter::only(["var2"]));
    assert_eq!(Value::Object(d), json!({"var2": {"var1": "hello", "var2": 55.5}}));
}

#[test]
fn test_to_mapping_ignore_subfields() {
    let obj = test_schema().instantiate().unwrap();
    let d = Serializer::new().to_mapping(&obj, &PathFilter::ignore(["var2"]));
    assert_eq!(Value::Object(d), json!({"var1": 4, "var3": true}));
}

#[test]
fn test_to_mapping_only_single_nested_field() {
    let obj = test_schema().instantiate().unwrap();
    let d = Serializer::new().to_mapping(&obj, &PathFilter::only(["var2.var2"]));
    assert_eq!(Value::Object(d), json!({"var2": {"var2": 55.5}}));
}

#[test]
fn test_from_mapping_only_subfields() {
    let ser = Serializer::new();
    let mut obj = test_schema().instantiate().unwrap();
    let d = ser.to_mapping(&obj, &PathFilter::all());

    obj.set("var1", json!(99)).unwrap();
    obj.set("var3", json!("sgghr")).unwrap();
    obj.set("var2.var1", json!("zzz")).unwrap();

    ser.from_mapping(&mut obj, &d, &PathFilter::only(["var2"]), true).unwrap();
    assert_eq!(scalar(&obj, "var1"), json!(99));
    assert_eq!(scalar(&obj, "var2.var1"), json!("hello"));
    assert_eq!(scalar(&obj, "var3"), json!("sgghr"));
}

#[test]
fn test_from_mapping_ignore_subfields() {
    let ser = Serializer::new();
    let mut obj = test_schema().instantiate().unwrap();
    let mut d = ser.to_mapping(&obj, &PathFilter::all());
    d["var2"]["var1"] = json!("xxx");
    d["var2"]["var2"] = json!(99);

    ser.from_mapping(&mut obj, &d, &PathFilter::ignore(["var2"]), true).unwrap();
    assert_eq!(obj, test_schema().instantiate().unwrap());
}

#[test]
fn test_filter_is_textual_prefix() {
    let schema = Schema::builder("Prefix")
        .field("var1", 1)
        .field("var10", 10)
        .field("var2", 2)
        .build()
        .unwrap();
    let obj = schema.instantiate().unwrap();

    let d = Serializer::new().to_mapping(&obj, &PathFilter::only(["var1"]));
    assert_eq!(Value::Object(d), json!({"var1": 1, "var10": 10}));
}

#[test]
fn test_only_and_ignore_together_rejected() {
    let err = PathFilter::new(["var1"], ["var2"]).unwrap_err();
    assert!(matches!(err, ObjError::InvalidFilter));
    assert_eq!(err.code(), "VOBJ_INVALID_FILTER");
}

// =============================================================================
// Custom Value Tests
// =============================================================================

fn custom_schema() -> Schema {
    Schema::builder("CustomConfig")
        .field("val1", 10)
        .custom("val2", Triple { a: 1, b: 2, c: 3 })
        .build()
        .unwrap()
}

#[test]
fn test_custom_value_decodes_in_place() {
    let ser = Serializer::new();
    let mut obj = custom_schema().instantiate().unwrap();

    let mut d = ser.to_mapping(&obj, &PathFilter::all());
    assert_eq!(d["val2"], json!("1:2:3"));
    d.insert("val2".into(), json!("5:6:7"));

    let before: *const Triple = obj.get("val2").unwrap().downcast_custom::<Triple>().unwrap();
    let result = ser.from_mapping(&mut obj, &d, &PathFilter::all(), true).unwrap();
    assert!(result.is_none());

    let after = obj.get("val2").unwrap().downcast_custom::<Triple>().unwrap();
    assert!(std::ptr::eq(before, after));
    assert_eq!(after, &Triple { a: 5, b: 6, c: 7 });
    assert_eq!(scalar(&obj, "val1"), json!(10));
}

#[test]
fn test_custom_decode_rejection() {
    let mut obj = custom_schema().instantiate().unwrap();
    let err = obj.set("val2", json!("not-a-triple")).unwrap_err();
    assert!(matches!(err, ObjError::Decode { .. }));
    assert_eq!(
        obj.get("val2").unwrap().downcast_custom::<Triple>(),
        Some(&Triple { a: 1, b: 2, c: 3 })
    );
}

#[test]
fn test_custom_values_are_independent_per_instance() {
    let schema = custom_schema();
    let mut first = schema.instantiate().unwrap();
    let second = schema.instantiate().unwrap();

    first
        .get_mut("val2")
        .unwrap()
        .downcast_custom_mut::<Triple>()
        .unwrap()
        .a = 100;
    assert_eq!(second.get("val2").unwrap().downcast_custom::<Triple>().unwrap().a, 1);
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_missing_field_rejected_without_mutation() {
    let ser = Serializer::new();
    let mut obj = test_schema().instantiate().unwrap();
    let before = obj.clone();

    let err = ser
        .from_mapping(&mut obj, &mapping(json!({"var1": 8, "var2": {"var1": "x"}})), &PathFilter::all(), true)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Input validation failed: Attributes missing from mapping: var3,var2.var2"
    );
    assert_eq!(obj, before);
}

#[test]
fn test_extra_field_rejected_without_mutation() {
    let ser = Serializer::new();
    let mut obj = test_schema().instantiate().unwrap();
    let before = obj.clone();

    let d = mapping(json!({"var1": 8, "var2": {"var1": "x", "var2": 1.0, "var9": 0}, "var3": false}));
    let err = ser.from_mapping(&mut obj, &d, &PathFilter::all(), true).unwrap_err();
    assert!(matches!(err, ObjError::InputValidation(_)));
    assert_eq!(obj, before);
}

#[test]
fn test_missing_field_allowed_without_validation() {
    let ser = Serializer::new();
    let mut obj = test_schema().instantiate().unwrap();

    ser.from_mapping(&mut obj, &mapping(json!({"var2": {"var2": 1.5}})), &PathFilter::all(), false)
        .unwrap();
    assert_eq!(scalar(&obj, "var1"), json!(4));
    assert_eq!(scalar(&obj, "var2.var2"), json!(1.5));
}

#[test]
fn test_unknown_key_is_lookup_without_validation() {
    let ser = Serializer::new();
    let mut obj = test_schema().instantiate().unwrap();
    let err = ser
        .from_mapping(&mut obj, &mapping(json!({"nope": 1})), &PathFilter::all(), false)
        .unwrap_err();
    assert!(matches!(err, ObjError::Lookup { .. }));
}

#[test]
fn test_validate_accepts_exact_layout() {
    let ser = Serializer::new();
    let obj = test_schema().instantiate().unwrap();
    let d = ser.to_mapping(&obj, &PathFilter::all());
    ser.validate(&obj, &d, &PathFilter::all()).unwrap();
}

// =============================================================================
// List Tests
// =============================================================================

fn list_schema() -> (Schema, Schema) {
    let element = Schema::builder("Friend")
        .field("name", "")
        .field("level", 1)
        .build()
        .unwrap();
    let schema = Schema::builder("Friends")
        .field("owner", "me")
        .list("friends", &element)
        .build()
        .unwrap();
    (schema, element)
}

#[test]
fn test_list_round_trip() {
    let (schema, element) = list_schema();
    let ser = Serializer::new();
    let mut obj = schema.instantiate().unwrap();
    {
        let list = obj.get_mut("friends").unwrap().as_list_mut().unwrap();
        list.push(element.instantiate_with([("name", json!("ann"))]).unwrap()).unwrap();
        list.push(element.instantiate_with([("name", json!("bob")), ("level", json!(3))]).unwrap())
            .unwrap();
    }

    let d = ser.to_mapping(&obj, &PathFilter::all());
    assert_eq!(
        d["friends"],
        json!([{"name": "ann", "level": 1}, {"name": "bob", "level": 3}])
    );

    let (loaded, _) = ser.new_from_mapping(&schema, &d, &PathFilter::all(), true).unwrap();
    assert_eq!(loaded, obj);
    let list = loaded.get("friends").unwrap().as_list().unwrap();
    assert_eq!(list.element(), &element);
    assert_eq!(list.len(), 2);
}

#[test]
fn test_list_items_are_validated() {
    let (schema, _) = list_schema();
    let ser = Serializer::new();
    let d = mapping(json!({"owner": "me", "friends": [{"name": "ann"}]}));

    let err = ser.new_from_mapping(&schema, &d, &PathFilter::all(), true).unwrap_err();
    assert!(matches!(err, ObjError::InputValidation(_)));

    let (obj, _) = ser.new_from_mapping(&schema, &d, &PathFilter::all(), false).unwrap();
    let friend = obj.get("friends").unwrap().as_list().unwrap().get(0).unwrap();
    assert_eq!(scalar(friend, "level"), json!(1));
}

#[test]
fn test_list_requires_array_of_mappings() {
    let (schema, _) = list_schema();
    let mut obj = schema.instantiate().unwrap();

    let err = obj.set("friends", json!({"name": "ann"})).unwrap_err();
    assert!(matches!(err, ObjError::TypeMismatch { expected: "array", .. }));

    let err = obj.set("friends", json!([1, 2])).unwrap_err();
    assert!(matches!(err, ObjError::TypeMismatch { expected: "object", .. }));
    assert!(matches!(obj.get("friends").unwrap(), FieldValue::List(list) if list.is_empty()));
}

// =============================================================================
// JSON and File Tests
// =============================================================================

#[test]
fn test_json_round_trip() {
    let ser = Serializer::with_config(SerializerConfig::indented(4));
    let mut obj = test_schema().instantiate().unwrap();
    obj.set("var2.var2", json!(-1.25)).unwrap();

    let text = ser.to_json(&obj, &PathFilter::all()).unwrap();
    assert!(text.contains("\n    \"var1\": 4"));

    let (loaded, _) = ser.new_from_json(&test_schema(), &text, &PathFilter::all(), true).unwrap();
    assert_eq!(loaded, obj);
}

#[test]
fn test_invalid_json_is_load_error() {
    let ser = Serializer::new();
    let mut obj = test_schema().instantiate().unwrap();
    let err = ser.from_json(&mut obj, "{\"var1\": 5,", &PathFilter::all(), true).unwrap_err();
    assert!(matches!(err, ObjError::Load(_)));
    assert_eq!(err.code(), "VOBJ_LOAD");
}

#[test]
fn test_file_round_trip_with_filter() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.json");
    let ser = Serializer::new();

    let mut obj = test_schema().instantiate().unwrap();
    obj.set("var1", json!(77)).unwrap();
    ser.to_file(&obj, &path, &PathFilter::only(["var1"])).unwrap();

    let mut fresh = test_schema().instantiate().unwrap();
    ser.from_file(&mut fresh, &path, &PathFilter::only(["var1"]), true).unwrap();
    assert_eq!(scalar(&fresh, "var1"), json!(77));
    assert_eq!(scalar(&fresh, "var2.var1"), json!("hello"));
}

#[test]
fn test_invalid_json_file_is_load_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("broken.json");
    std::fs::write(&path, "}{").unwrap();

    let err = Serializer::new()
        .new_from_file(&test_schema(), &path, &PathFilter::all(), true)
        .unwrap_err();
    assert!(matches!(err, ObjError::Load(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let tmp = TempDir::new().unwrap();
    let err = Serializer::new()
        .new_from_file(&test_schema(), &tmp.path().join("absent.json"), &PathFilter::all(), true)
        .unwrap_err();
    assert!(matches!(err, ObjError::Io(_)));
}
