//! Breadth-first walk over a live object tree
//!
//! Nodes are visited level by level. Within a node, fields come in schema
//! declaration order. Nested objects are never yielded themselves; their
//! fields are yielded with an extended path once the current level is done.

use std::collections::VecDeque;
use std::slice;

use crate::path::{FieldPath, PathFilter};
use crate::schema::ObjectInstance;
use crate::value::FieldValue;

/// A leaf field reached by the instance walk
#[derive(Debug, Clone)]
pub struct InstanceField<'a> {
    pub path: FieldPath,
    pub value: &'a FieldValue,
}

/// Iterator over the leaf fields of an instance that pass a filter
pub struct InstanceWalk<'a> {
    filter: &'a PathFilter,
    pending: VecDeque<(FieldPath, &'a ObjectInstance)>,
    current: Option<(FieldPath, slice::Iter<'a, (String, FieldValue)>)>,
}

/// Starts a walk at `root`.
pub fn walk_instance<'a>(root: &'a ObjectInstance, filter: &'a PathFilter) -> InstanceWalk<'a> {
    let mut pending = VecDeque::new();
    pending.push_back((FieldPath::root(), root));
    InstanceWalk {
        filter,
        pending,
        current: None,
    }
}

impl<'a> Iterator for InstanceWalk<'a> {
    type Item = InstanceField<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((prefix, fields)) = self.current.as_mut() {
                for (name, value) in fields.by_ref() {
                    let path = prefix.child(name);
                    match value {
                        FieldValue::Nested(child) => self.pending.push_back((path, child)),
                        _ => {
                            if self.filter.should_include(&path.dotted()) {
                                return Some(InstanceField { path, value });
                            }
                        }
                    }
                }
            }

            let (prefix, obj) = self.pending.pop_front()?;
            self.current = Some((prefix, obj.slots().iter()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    fn tree() -> ObjectInstance {
        let inner = Schema::builder("Inner").field("deep", 0).build().unwrap();
        let middle = Schema::builder("Middle")
            .nested("inner", &inner)
            .field("m", "x")
            .build()
            .unwrap();
        Schema::builder("Root")
            .field("a", 1)
            .nested("mid", &middle)
            .field("b", json!([1, 2]))
            .build()
            .unwrap()
            .instantiate()
            .unwrap()
    }

    fn dotted(walk: InstanceWalk<'_>) -> Vec<String> {
        walk.map(|f| f.path.dotted()).collect()
    }

    #[test]
    fn test_breadth_first_schema_order() {
        let obj = tree();
        let filter = PathFilter::all();
        assert_eq!(dotted(walk_instance(&obj, &filter)), vec!["a", "b", "mid.m", "mid.inner.deep"]);
    }

    #[test]
    fn test_filter_applies_to_leaves_only() {
        let obj = tree();

        let only = PathFilter::only(["mid"]);
        assert_eq!(dotted(walk_instance(&obj, &only)), vec!["mid.m", "mid.inner.deep"]);

        let ignore = PathFilter::ignore(["mid.inner"]);
        assert_eq!(dotted(walk_instance(&obj, &ignore)), vec!["a", "b", "mid.m"]);
    }

    #[test]
    fn test_empty_schema_yields_nothing() {
        let obj = Schema::builder("Empty").build().unwrap().instantiate().unwrap();
        let filter = PathFilter::all();
        assert_eq!(walk_instance(&obj, &filter).count(), 0);
    }

    #[test]
    fn test_leaf_values_are_borrowed_from_instance() {
        let obj = tree();
        let filter = PathFilter::only(["b"]);
        let field = walk_instance(&obj, &filter).next().unwrap();
        assert!(std::ptr::eq(field.value, obj.get("b").unwrap()));
    }
}
