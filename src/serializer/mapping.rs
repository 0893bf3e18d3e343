//! Conversion between instances and mappings
//!
//! # Load order
//!
//! 1. Migrate the raw mapping when the root is versioned; a failed outcome
//!    returns before anything else happens
//! 2. Validate, if requested
//! 3. Drop the root `version` key
//! 4. Walk the mapping and stage every assignment that can fail
//! 5. Decode custom values in place, then commit the staged slots
//!
//! Steps 1 to 4 never touch the instance. A custom value rejecting its input
//! in step 5 leaves custom values decoded before it in place.

use std::collections::HashMap;

use serde_json::Value;

use crate::errors::{ObjError, ObjResult};
use crate::migration::MigrationOutcome;
use crate::path::{insert_into_mapping, resolve, resolve_mut, FieldPath, PathFilter};
use crate::schema::{ObjectInstance, Schema, VERSION_FIELD};
use crate::value::{json_type_name, CustomCoded, FieldValue, Mapping, ObjectList};
use crate::walker::{walk_instance, walk_mapping};

/// Builds the mapping form of `obj`, restricted by `filter`.
pub(crate) fn object_to_mapping(obj: &ObjectInstance, filter: &PathFilter) -> Mapping {
    let mut mapping = Mapping::new();
    for field in walk_instance(obj, filter) {
        insert_into_mapping(&mut mapping, &field.path, field.value.to_plain());
    }
    mapping
}

/// Checks that the leaves of `mapping` and of `obj` name the same fields.
///
/// The root `version` field is exempt on both sides.
pub(crate) fn validate_mapping(
    obj: &ObjectInstance,
    mapping: &Mapping,
    filter: &PathFilter,
) -> ObjResult<()> {
    let expected: Vec<String> = walk_instance(obj, filter)
        .map(|field| field.path.dotted())
        .filter(|name| name != VERSION_FIELD)
        .collect();
    let index: HashMap<&str, usize> = expected
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();
    let mut seen = vec![false; expected.len()];

    let leaves = walk_mapping(obj, mapping, filter).map_err(|e| {
        tracing::debug!(error = %e, "mapping does not match object layout");
        ObjError::InputValidation(e.to_string())
    })?;

    for leaf in leaves {
        let name = leaf.path.dotted();
        if name == VERSION_FIELD {
            continue;
        }
        match index.get(name.as_str()) {
            Some(&i) => seen[i] = true,
            None => {
                tracing::debug!(field = %name, "unrecognized field in mapping");
                return Err(ObjError::InputValidation(format!(
                    "Unrecognized attribute name '{}' in mapping",
                    name
                )));
            }
        }
    }

    let missing: Vec<&str> = expected
        .iter()
        .zip(&seen)
        .filter(|(_, seen)| !**seen)
        .map(|(name, _)| name.as_str())
        .collect();

    if !missing.is_empty() {
        tracing::debug!(missing = %missing.join(","), "fields missing from mapping");
        return Err(ObjError::InputValidation(format!(
            "Attributes missing from mapping: {}",
            missing.join(",")
        )));
    }

    Ok(())
}

/// Loads `mapping` into `obj`: migration, optional validation, then the
/// mapping walk.
pub(crate) fn load_mapping(
    obj: &mut ObjectInstance,
    mapping: Mapping,
    filter: &PathFilter,
    validate: bool,
) -> ObjResult<Option<MigrationOutcome>> {
    let (outcome, mapping) = match obj.version() {
        Some(target) => obj.schema().migrations().resolve(mapping, &target),
        None => (None, mapping),
    };

    if let Some(outcome) = &outcome {
        if !outcome.success {
            return Ok(Some(outcome.clone()));
        }
    }

    if validate {
        validate_mapping(obj, &mapping, filter)?;
    }

    let mapping: Mapping = mapping
        .into_iter()
        .filter(|(name, _)| name != VERSION_FIELD)
        .collect();

    apply_mapping(obj, &mapping, filter, validate)?;

    tracing::debug!(schema = %obj.schema().name(), fields = mapping.len(), "loaded mapping");
    Ok(outcome)
}

enum Staged<'m> {
    Assign(FieldValue),
    Decode(&'m Value),
}

/// Writes the leaves of `mapping` into `obj` without migration or validation.
pub(crate) fn apply_mapping(
    obj: &mut ObjectInstance,
    mapping: &Mapping,
    filter: &PathFilter,
    validate: bool,
) -> ObjResult<()> {
    let leaves = walk_mapping(obj, mapping, filter)?;

    let mut staged = Vec::with_capacity(leaves.len());
    for leaf in leaves {
        let prepared = match resolve(obj, &leaf.path)? {
            FieldValue::Scalar(_) => Staged::Assign(FieldValue::Scalar(leaf.value.clone())),
            FieldValue::Custom(_) => Staged::Decode(leaf.value),
            FieldValue::List(list) => Staged::Assign(FieldValue::List(load_list(
                list.element(),
                &leaf.path,
                leaf.value,
                validate,
            )?)),
            // Nested slots with a mapping value are descended by the walk
            FieldValue::Nested(_) => return Err(type_mismatch(&leaf.path, "object", leaf.value)),
        };
        staged.push((leaf.path, prepared));
    }

    for (path, prepared) in &staged {
        if let Staged::Decode(value) = prepared {
            if let FieldValue::Custom(custom) = resolve_mut(obj, path)? {
                decode_custom(&mut **custom, path, value)?;
            }
        }
    }

    for (path, prepared) in staged {
        if let Staged::Assign(value) = prepared {
            *resolve_mut(obj, &path)? = value;
        }
    }

    Ok(())
}

/// Writes one plain value into an existing slot, keeping the slot's kind.
pub(crate) fn assign_plain(
    slot: &mut FieldValue,
    path: &FieldPath,
    value: &Value,
    validate: bool,
) -> ObjResult<()> {
    match slot {
        FieldValue::Scalar(current) => {
            *current = value.clone();
            Ok(())
        }
        FieldValue::Custom(custom) => decode_custom(&mut **custom, path, value),
        FieldValue::List(list) => {
            *list = load_list(list.element(), path, value, validate)?;
            Ok(())
        }
        FieldValue::Nested(obj) => match value {
            Value::Object(mapping) => {
                if validate {
                    validate_mapping(obj, mapping, &PathFilter::all())?;
                }
                apply_mapping(obj, mapping, &PathFilter::all(), validate)
            }
            other => Err(type_mismatch(path, "object", other)),
        },
    }
}

/// Builds a list of fresh `element` instances, one per mapping in `value`.
fn load_list(
    element: &Schema,
    path: &FieldPath,
    value: &Value,
    validate: bool,
) -> ObjResult<ObjectList> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(type_mismatch(path, "array", other)),
    };

    let mut loaded = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let mapping = match item {
            Value::Object(mapping) => mapping,
            other => {
                return Err(ObjError::TypeMismatch {
                    path: format!("{}[{}]", path, index),
                    expected: "object",
                    found: json_type_name(other),
                })
            }
        };

        let mut instance = element.instantiate()?;
        let outcome = load_mapping(&mut instance, mapping.clone(), &PathFilter::all(), validate)?;
        if let Some(outcome) = outcome.filter(|o| !o.success) {
            return Err(ObjError::InputValidation(format!(
                "List item {}[{}]: {}",
                path, index, outcome
            )));
        }
        loaded.push(instance);
    }

    ObjectList::from_items(element, loaded)
}

fn decode_custom(custom: &mut dyn CustomCoded, path: &FieldPath, value: &Value) -> ObjResult<()> {
    custom.decode(value).map_err(|e| ObjError::Decode {
        path: path.dotted(),
        message: e.to_string(),
    })
}

fn type_mismatch(path: &FieldPath, expected: &'static str, value: &Value) -> ObjError {
    ObjError::TypeMismatch {
        path: path.dotted(),
        expected,
        found: json_type_name(value),
    }
}
