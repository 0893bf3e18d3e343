//! Field path addressing
//!
//! A [`FieldPath`] names a slot at any depth of an object tree. Both traversal
//! directions (instance → mapping and mapping → instance) address slots
//! through the helpers in this file.

use std::fmt;

use serde_json::Value;

use crate::errors::{ObjError, ObjResult};
use crate::schema::ObjectInstance;
use crate::value::{FieldValue, Mapping};

/// Ordered sequence of field names; canonical text form joins them with `.`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// The empty path, addressing the root object itself
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a dotted name such as `a.b.c`. An empty string is the root.
    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::root();
        }
        Self {
            segments: dotted.split('.').map(str::to_string).collect(),
        }
    }

    /// Returns a new path extended by one field name
    pub fn child(&self, name: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(name.to_string());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// All segments except the last one
    pub fn parents(&self) -> &[String] {
        match self.segments.split_last() {
            Some((_, parents)) => parents,
            None => &[],
        }
    }

    /// The last segment, if any
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Canonical dotted form
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

impl From<&str> for FieldPath {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

impl From<String> for FieldPath {
    fn from(dotted: String) -> Self {
        Self::parse(&dotted)
    }
}

/// Reads the slot at `path`, walking parent segments through nested objects.
///
/// # Errors
///
/// `Lookup` if any segment has no matching field, or if a parent segment is
/// not a nested object.
pub fn resolve<'a>(root: &'a ObjectInstance, path: &FieldPath) -> ObjResult<&'a FieldValue> {
    let leaf = path
        .leaf()
        .ok_or_else(|| ObjError::lookup("", ""))?;

    let mut obj = root;
    for name in path.parents() {
        obj = match obj.field(name) {
            Some(FieldValue::Nested(child)) => child,
            _ => return Err(ObjError::lookup(path.dotted(), name.as_str())),
        };
    }

    obj.field(leaf)
        .ok_or_else(|| ObjError::lookup(path.dotted(), leaf))
}

/// Mutable counterpart of [`resolve`].
pub fn resolve_mut<'a>(
    root: &'a mut ObjectInstance,
    path: &FieldPath,
) -> ObjResult<&'a mut FieldValue> {
    let leaf = path
        .leaf()
        .ok_or_else(|| ObjError::lookup("", ""))?;

    let mut obj = root;
    for name in path.parents() {
        obj = match obj.field_mut(name) {
            Some(FieldValue::Nested(child)) => child,
            _ => return Err(ObjError::lookup(path.dotted(), name.as_str())),
        };
    }

    obj.field_mut(leaf)
        .ok_or_else(|| ObjError::lookup(path.dotted(), leaf))
}

/// Writes `value` into `mapping` at `path`, creating intermediate
/// sub-mappings as needed. A non-mapping value sitting on an intermediate
/// segment is replaced.
pub fn insert_into_mapping(mapping: &mut Mapping, path: &FieldPath, value: Value) {
    let Some(leaf) = path.leaf() else {
        return;
    };

    let mut attrs = mapping;
    for name in path.parents() {
        let entry = attrs
            .entry(name.clone())
            .or_insert_with(|| Value::Object(Mapping::new()));
        if !entry.is_object() {
            *entry = Value::Object(Mapping::new());
        }
        let Value::Object(map) = entry else {
            return;
        };
        attrs = map;
    }

    attrs.insert(leaf.to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_and_dotted() {
        let path = FieldPath::parse("a.b.c");
        assert_eq!(path.segments(), &["a", "b", "c"]);
        assert_eq!(path.parents(), &["a", "b"]);
        assert_eq!(path.leaf(), Some("c"));
        assert_eq!(path.to_string(), "a.b.c");
    }

    #[test]
    fn test_root_path() {
        let path = FieldPath::parse("");
        assert!(path.is_root());
        assert_eq!(path.leaf(), None);
        assert!(path.parents().is_empty());
    }

    #[test]
    fn test_child_extends_without_mutating() {
        let parent = FieldPath::parse("a");
        let child = parent.child("b");
        assert_eq!(parent.dotted(), "a");
        assert_eq!(child.dotted(), "a.b");
    }

    #[test]
    fn test_insert_creates_intermediate_mappings() {
        let mut mapping = Mapping::new();
        insert_into_mapping(&mut mapping, &FieldPath::parse("x"), json!(1));
        insert_into_mapping(&mut mapping, &FieldPath::parse("a.b.c"), json!("deep"));
        insert_into_mapping(&mut mapping, &FieldPath::parse("a.d"), json!(true));

        assert_eq!(
            Value::Object(mapping),
            json!({"x": 1, "a": {"b": {"c": "deep"}, "d": true}})
        );
    }

    #[test]
    fn test_insert_replaces_scalar_on_intermediate_segment() {
        let mut mapping = Mapping::new();
        insert_into_mapping(&mut mapping, &FieldPath::parse("a"), json!(5));
        insert_into_mapping(&mut mapping, &FieldPath::parse("a.b"), json!(6));
        assert_eq!(Value::Object(mapping), json!({"a": {"b": 6}}));
    }
}
