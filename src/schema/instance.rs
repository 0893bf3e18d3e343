//! Object instances
//!
//! An [`ObjectInstance`] owns its field values outright. Instances never share
//! state with each other or with the schema defaults they were built from.
//! Mutation is single-owner; there is no internal locking.

use serde_json::Value;

use crate::errors::{ObjError, ObjResult};
use crate::path::{resolve, resolve_mut, FieldPath, PathFilter};
use crate::serializer::assign_plain;
use crate::value::FieldValue;
use crate::walker::{walk_instance, InstanceWalk};

use super::types::{Schema, VERSION_FIELD};

/// A live value tree built from a [`Schema`]
#[derive(Debug, Clone)]
pub struct ObjectInstance {
    schema: Schema,
    slots: Vec<(String, FieldValue)>,
}

impl ObjectInstance {
    pub(crate) fn from_parts(schema: Schema, slots: Vec<(String, FieldValue)>) -> Self {
        Self { schema, slots }
    }

    /// The schema this instance was built from
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The value of this instance's `version` field, if it has one
    pub fn version(&self) -> Option<String> {
        match self.field(VERSION_FIELD)? {
            FieldValue::Scalar(value) => crate::migration::version_string(value),
            _ => None,
        }
    }

    pub(crate) fn slots(&self) -> &[(String, FieldValue)] {
        &self.slots
    }

    /// Direct field of this object (no path traversal)
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.slots
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.slots
            .iter_mut()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Direct fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.slots.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Reads the field at a dotted path such as `display.volume`
    pub fn get(&self, path: impl Into<FieldPath>) -> ObjResult<&FieldValue> {
        resolve(self, &path.into())
    }

    pub fn get_mut(&mut self, path: impl Into<FieldPath>) -> ObjResult<&mut FieldValue> {
        resolve_mut(self, &path.into())
    }

    /// Writes a plain value into the field at `path`.
    ///
    /// Scalars are replaced, custom values decode the input in place, lists
    /// are rebuilt from an array of mappings and nested objects are loaded
    /// from a mapping.
    pub fn set(&mut self, path: impl Into<FieldPath>, value: Value) -> ObjResult<()> {
        let path = path.into();
        let slot = resolve_mut(self, &path)?;
        assign_plain(slot, &path, &value, false)
    }

    /// Swaps the whole slot at `path`, returning the previous content.
    ///
    /// The new value must have the slot's kind. Nested objects must share the
    /// slot's schema, lists its element schema, custom values its type.
    pub fn replace(&mut self, path: impl Into<FieldPath>, value: FieldValue) -> ObjResult<FieldValue> {
        let path = path.into();
        let slot = resolve_mut(self, &path)?;
        check_same_shape(slot, &value, &path)?;
        Ok(std::mem::replace(slot, value))
    }

    /// Leaf fields (`path`, value) in traversal order, restricted by `filter`
    pub fn attributes<'a>(&'a self, filter: &'a PathFilter) -> InstanceWalk<'a> {
        walk_instance(self, filter)
    }

    /// Dotted names of every leaf field
    pub fn paths(&self) -> Vec<String> {
        let filter = PathFilter::all();
        walk_instance(self, &filter).map(|f| f.path.dotted()).collect()
    }

    /// Discards every change and rebuilds the instance from its schema's
    /// current defaults.
    pub fn reset_to_defaults(&mut self) -> ObjResult<()> {
        *self = self.schema.instantiate()?;
        Ok(())
    }

    /// Writes each `(path, value)` pair with [`set`](Self::set). Paths that
    /// name no field are skipped; any other failure is returned.
    pub fn apply_initial_overrides<I, P>(&mut self, overrides: I) -> ObjResult<()>
    where
        I: IntoIterator<Item = (P, Value)>,
        P: Into<FieldPath>,
    {
        for (path, value) in overrides {
            match self.set(path, value) {
                Ok(()) | Err(ObjError::Lookup { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

fn check_same_shape(current: &FieldValue, new: &FieldValue, path: &FieldPath) -> ObjResult<()> {
    let mismatch = |expected: String, found: String| ObjError::SlotMismatch {
        path: path.dotted(),
        expected,
        found,
    };

    match (current, new) {
        (FieldValue::Scalar(_), FieldValue::Scalar(_)) => Ok(()),
        (FieldValue::Nested(cur), FieldValue::Nested(obj)) => {
            if cur.schema() == obj.schema() {
                Ok(())
            } else {
                Err(mismatch(
                    format!("object '{}'", cur.schema().name()),
                    format!("object '{}'", obj.schema().name()),
                ))
            }
        }
        (FieldValue::List(cur), FieldValue::List(list)) => {
            if cur.element() == list.element() {
                Ok(())
            } else {
                Err(ObjError::ListElementMismatch {
                    expected: cur.element().name(),
                    found: list.element().name(),
                })
            }
        }
        (FieldValue::Custom(cur), FieldValue::Custom(custom)) => {
            if cur.as_any().type_id() == custom.as_any().type_id() {
                Ok(())
            } else {
                Err(mismatch(
                    format!("custom '{}'", cur.type_name()),
                    format!("custom '{}'", custom.type_name()),
                ))
            }
        }
        _ => Err(ObjError::TypeMismatch {
            path: path.dotted(),
            expected: current.kind().kind_name(),
            found: new.kind().kind_name(),
        }),
    }
}

impl PartialEq for ObjectInstance {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested_schema() -> Schema {
        Schema::builder("NestedConfig")
            .field("var1", "hey")
            .field("var2", false)
            .build()
            .unwrap()
    }

    fn top_schema(nested: &Schema) -> Schema {
        Schema::builder("TestConfig")
            .field("var1", 1)
            .nested("var2", nested)
            .build()
            .unwrap()
    }

    #[test]
    fn test_access_by_dotname() {
        let obj = top_schema(&nested_schema()).instantiate().unwrap();
        assert_eq!(obj.get("var1").unwrap().as_scalar(), Some(&json!(1)));
        assert_eq!(obj.get("var2.var1").unwrap().as_scalar(), Some(&json!("hey")));
        assert_eq!(obj.get("var2.var2").unwrap().as_scalar(), Some(&json!(false)));
    }

    #[test]
    fn test_write_by_dotname() {
        let mut obj = top_schema(&nested_schema()).instantiate().unwrap();
        obj.set("var1", json!(99)).unwrap();
        obj.set("var2.var1", json!("xxx")).unwrap();
        obj.set("var2.var2", json!(true)).unwrap();

        assert_eq!(obj.get("var1").unwrap().as_scalar(), Some(&json!(99)));
        assert_eq!(obj.get("var2.var1").unwrap().as_scalar(), Some(&json!("xxx")));
        assert_eq!(obj.get("var2.var2").unwrap().as_scalar(), Some(&json!(true)));
    }

    #[test]
    fn test_unknown_segment_is_lookup_error() {
        let mut obj = top_schema(&nested_schema()).instantiate().unwrap();
        assert!(matches!(obj.get("var9"), Err(ObjError::Lookup { .. })));
        assert!(matches!(obj.get("var2.var9"), Err(ObjError::Lookup { .. })));
        assert!(matches!(obj.get("var1.var1"), Err(ObjError::Lookup { .. })));
        assert!(matches!(obj.set("var9.x", json!(1)), Err(ObjError::Lookup { .. })));
    }

    #[test]
    fn test_set_nested_from_mapping() {
        let mut obj = top_schema(&nested_schema()).instantiate().unwrap();
        obj.set("var2", json!({"var1": "ho"})).unwrap();
        assert_eq!(obj.get("var2.var1").unwrap().as_scalar(), Some(&json!("ho")));
        assert_eq!(obj.get("var2.var2").unwrap().as_scalar(), Some(&json!(false)));
    }

    #[test]
    fn test_set_nested_from_scalar_is_rejected() {
        let mut obj = top_schema(&nested_schema()).instantiate().unwrap();
        let err = obj.set("var2", json!(5)).unwrap_err();
        assert!(matches!(err, ObjError::TypeMismatch { expected: "object", .. }));
        assert!(obj.get("var2").unwrap().as_nested().is_some());
    }

    #[test]
    fn test_iterate_and_set_attributes() {
        let mut obj = top_schema(&nested_schema()).instantiate().unwrap();
        for path in obj.paths() {
            obj.set(path.as_str(), json!(99)).unwrap();
        }
        assert_eq!(obj.get("var1").unwrap().as_scalar(), Some(&json!(99)));
        assert_eq!(obj.get("var2.var1").unwrap().as_scalar(), Some(&json!(99)));
        assert_eq!(obj.get("var2.var2").unwrap().as_scalar(), Some(&json!(99)));
    }

    #[test]
    fn test_overrides_skip_unknown_paths() {
        let schema = top_schema(&nested_schema());
        let obj = schema
            .instantiate_with([
                ("var1", json!(5)),
                ("var2.var1", json!("set")),
                ("does.not.exist", json!(0)),
            ])
            .unwrap();
        assert_eq!(obj.get("var1").unwrap().as_scalar(), Some(&json!(5)));
        assert_eq!(obj.get("var2.var1").unwrap().as_scalar(), Some(&json!("set")));
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut obj = top_schema(&nested_schema()).instantiate().unwrap();
        obj.set("var1", json!(42)).unwrap();
        obj.set("var2.var2", json!(true)).unwrap();

        obj.reset_to_defaults().unwrap();
        assert_eq!(obj, obj.schema().instantiate().unwrap());
    }

    #[test]
    fn test_replace_swaps_whole_slot() {
        let nested = nested_schema();
        let mut obj = top_schema(&nested).instantiate().unwrap();
        let mut fresh = nested.instantiate().unwrap();
        fresh.set("var1", json!("swapped")).unwrap();

        let old = obj.replace("var2", FieldValue::Nested(fresh)).unwrap();
        assert_eq!(old.as_nested().unwrap().get("var1").unwrap().as_scalar(), Some(&json!("hey")));
        assert_eq!(obj.get("var2.var1").unwrap().as_scalar(), Some(&json!("swapped")));
    }

    #[test]
    fn test_replace_keeps_slot_kind() {
        let mut obj = top_schema(&nested_schema()).instantiate().unwrap();
        let before = obj.clone();

        let err = obj.replace("var2", FieldValue::Scalar(json!(5))).unwrap_err();
        assert!(matches!(
            err,
            ObjError::TypeMismatch { expected: "object", found: "scalar", .. }
        ));

        let stranger = Schema::builder("NestedConfig").field("var1", "hey").build().unwrap();
        let err = obj
            .replace("var2", FieldValue::Nested(stranger.instantiate().unwrap()))
            .unwrap_err();
        assert_eq!(err.code(), "VOBJ_SLOT_MISMATCH");
        assert_eq!(obj, before);
    }
}
