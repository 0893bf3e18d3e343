//! Breadth-first walk over a plain mapping, guided by a live instance
//!
//! The mapping carries no type information, so every key is resolved against
//! the instance at the same path. A key descends only when the instance field
//! is a nested object and the mapping value is itself a mapping; anything else
//! is a leaf.

use std::collections::VecDeque;

use serde_json::Value;

use crate::errors::ObjResult;
use crate::path::{resolve, FieldPath, PathFilter};
use crate::schema::ObjectInstance;
use crate::value::{FieldValue, Mapping};

/// A leaf entry of the mapping walk
#[derive(Debug, Clone)]
pub struct MappingField<'m> {
    pub path: FieldPath,
    pub value: &'m Value,
}

/// Collects the leaf entries of `mapping` that pass `filter`, in mapping-key
/// order level by level.
///
/// # Errors
///
/// `Lookup` if a key names no field of `obj`. Keys are resolved before the
/// filter is applied, so excluded unknown keys fail too.
pub fn walk_mapping<'m>(
    obj: &ObjectInstance,
    mapping: &'m Mapping,
    filter: &PathFilter,
) -> ObjResult<Vec<MappingField<'m>>> {
    let mut leaves = Vec::new();
    let mut pending: VecDeque<(FieldPath, &'m Mapping)> = VecDeque::new();
    pending.push_back((FieldPath::root(), mapping));

    while let Some((prefix, attrs)) = pending.pop_front() {
        for (name, value) in attrs {
            let path = prefix.child(name);
            let field = resolve(obj, &path)?;

            match (field, value) {
                (FieldValue::Nested(_), Value::Object(sub)) => pending.push_back((path, sub)),
                _ => {
                    if filter.should_include(&path.dotted()) {
                        leaves.push(MappingField { path, value });
                    }
                }
            }
        }
    }

    Ok(leaves)
}
