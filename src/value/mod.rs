//! Field value model
//!
//! Every field slot of an object instance holds one of four variants:
//!
//! - `Scalar`: any JSON-compatible value
//! - `Nested`: another object instance
//! - `Custom`: a [`CustomValue`] with its own encoding
//! - `List`: an [`ObjectList`] of instances sharing one element schema
//!
//! The variant of a slot comes from the schema declaration, never from the
//! content of the value.

mod custom;
mod list;

use std::fmt;

use serde_json::Value;

pub use custom::{CustomCoded, CustomValue, DecodeError};
pub use list::ObjectList;

use crate::path::PathFilter;
use crate::schema::ObjectInstance;

/// Plain nested key → value structure used for interchange
pub type Mapping = serde_json::Map<String, Value>;

/// Variant tag of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Scalar,
    Nested,
    Custom,
    List,
}

impl FieldKind {
    /// Returns the kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldKind::Scalar => "scalar",
            FieldKind::Nested => "object",
            FieldKind::Custom => "custom",
            FieldKind::List => "list",
        }
    }

    /// Whether the walker yields fields of this kind as leaves
    pub fn is_leaf(&self) -> bool {
        !matches!(self, FieldKind::Nested)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind_name())
    }
}

/// Content of one field slot
#[derive(Debug, Clone)]
pub enum FieldValue {
    Scalar(Value),
    Nested(ObjectInstance),
    Custom(Box<dyn CustomCoded>),
    List(ObjectList),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Scalar(_) => FieldKind::Scalar,
            FieldValue::Nested(_) => FieldKind::Nested,
            FieldValue::Custom(_) => FieldKind::Custom,
            FieldValue::List(_) => FieldKind::List,
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            FieldValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_scalar_mut(&mut self) -> Option<&mut Value> {
        match self {
            FieldValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&ObjectInstance> {
        match self {
            FieldValue::Nested(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_nested_mut(&mut self) -> Option<&mut ObjectInstance> {
        match self {
            FieldValue::Nested(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ObjectList> {
        match self {
            FieldValue::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut ObjectList> {
        match self {
            FieldValue::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_custom(&self) -> Option<&dyn CustomCoded> {
        match self {
            FieldValue::Custom(custom) => Some(custom.as_ref()),
            _ => None,
        }
    }

    /// Borrows a custom value as its concrete type
    pub fn downcast_custom<T: CustomValue>(&self) -> Option<&T> {
        match self {
            FieldValue::Custom(custom) => custom.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Mutably borrows a custom value as its concrete type
    pub fn downcast_custom_mut<T: CustomValue>(&mut self) -> Option<&mut T> {
        match self {
            FieldValue::Custom(custom) => custom.as_any_mut().downcast_mut::<T>(),
            _ => None,
        }
    }

    /// Converts the slot to its interchange form. Custom values are encoded,
    /// nested objects and list items become mappings.
    pub fn to_plain(&self) -> Value {
        match self {
            FieldValue::Scalar(value) => value.clone(),
            FieldValue::Custom(custom) => custom.encode(),
            FieldValue::Nested(obj) => Value::Object(crate::serializer::object_to_mapping(
                obj,
                &PathFilter::all(),
            )),
            FieldValue::List(list) => Value::Array(
                list.iter()
                    .map(|item| {
                        Value::Object(crate::serializer::object_to_mapping(item, &PathFilter::all()))
                    })
                    .collect(),
            ),
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Scalar(a), FieldValue::Scalar(b)) => a == b,
            (FieldValue::Nested(a), FieldValue::Nested(b)) => a == b,
            (FieldValue::Custom(a), FieldValue::Custom(b)) => a.encode() == b.encode(),
            (FieldValue::List(a), FieldValue::List(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<ObjectInstance> for FieldValue {
    fn from(obj: ObjectInstance) -> Self {
        FieldValue::Nested(obj)
    }
}

impl From<ObjectList> for FieldValue {
    fn from(list: ObjectList) -> Self {
        FieldValue::List(list)
    }
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
