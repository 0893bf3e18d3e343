//! Schema declarations
//!
//! A [`Schema`] is an ordered field table with defaults. Declaration order is
//! the enumeration order of every traversal. Schemas are shared handles:
//! cloning one yields the same declaration, and a changed default is seen by
//! every instance created afterwards (never by earlier ones).

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use crate::errors::{ObjError, ObjResult};
use crate::migration::{version_string, MigrationChain, MigrationOutcome};
use crate::path::FieldPath;
use crate::value::{CustomCoded, CustomValue, FieldKind, FieldValue, Mapping, ObjectList};

use super::instance::ObjectInstance;

/// Name of the field holding a root schema's version
pub const VERSION_FIELD: &str = "version";

/// Stored default of one field
#[derive(Debug, Clone)]
pub enum FieldDefault {
    /// Any JSON-compatible value
    Scalar(Value),
    /// Nested object built from another schema
    Nested(Schema),
    /// Custom-coded value, cloned into every instance
    Custom(Box<dyn CustomCoded>),
    /// List of instances of `element`, starting with copies of `items`
    List {
        element: Schema,
        items: Vec<ObjectInstance>,
    },
}

impl FieldDefault {
    /// Creates a custom-coded default
    pub fn custom<T: CustomValue + Clone>(value: T) -> Self {
        FieldDefault::Custom(Box::new(value))
    }

    /// Creates an empty list default
    pub fn list(element: &Schema) -> Self {
        FieldDefault::List {
            element: element.clone(),
            items: Vec::new(),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldDefault::Scalar(_) => FieldKind::Scalar,
            FieldDefault::Nested(_) => FieldKind::Nested,
            FieldDefault::Custom(_) => FieldKind::Custom,
            FieldDefault::List { .. } => FieldKind::List,
        }
    }
}

impl From<Value> for FieldDefault {
    fn from(value: Value) -> Self {
        FieldDefault::Scalar(value)
    }
}

impl From<Schema> for FieldDefault {
    fn from(schema: Schema) -> Self {
        FieldDefault::Nested(schema)
    }
}

/// Field declaration: name plus default
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub default: FieldDefault,
}

struct SchemaDef {
    name: String,
    fields: Vec<FieldDef>,
    migrations: MigrationChain,
}

impl SchemaDef {
    fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Shared handle to a schema declaration.
///
/// Equality is identity: two handles are equal when they refer to the same
/// declaration.
#[derive(Clone)]
pub struct Schema {
    inner: Arc<RwLock<SchemaDef>>,
}

impl Schema {
    /// Starts declaring a schema called `name`
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SchemaDef> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SchemaDef> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn id(&self) -> *const RwLock<SchemaDef> {
        Arc::as_ptr(&self.inner)
    }

    pub fn name(&self) -> String {
        self.read().name.clone()
    }

    /// The current version, if this schema declares a `version` field
    pub fn version(&self) -> Option<String> {
        match &self.read().field(VERSION_FIELD)?.default {
            FieldDefault::Scalar(value) => version_string(value),
            _ => None,
        }
    }

    /// Whether a `version` field is declared
    pub fn is_versioned(&self) -> bool {
        self.read().field(VERSION_FIELD).is_some()
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> Vec<String> {
        self.read().fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Variant tag of `field` as declared, independent of any instance content
    pub fn classify(&self, field: &str) -> Option<FieldKind> {
        self.read().field(field).map(|f| f.default.kind())
    }

    /// A copy of the stored default of `field`
    pub fn default_of(&self, field: &str) -> Option<FieldDefault> {
        self.read().field(field).map(|f| f.default.clone())
    }

    /// Replaces the stored default of `field`.
    ///
    /// Existing instances keep their values; instances created afterwards
    /// start from the new default.
    pub fn set_default(&self, field: &str, default: impl Into<FieldDefault>) -> ObjResult<()> {
        let mut def = self.write();
        let schema_name = def.name.clone();
        let slot = def
            .fields
            .iter_mut()
            .find(|f| f.name == field)
            .ok_or_else(|| ObjError::lookup(schema_name, field))?;
        slot.default = default.into();
        Ok(())
    }

    /// Registers a transform moving data from `from_version` (`None` for data
    /// without a version) to `to_version`.
    ///
    /// Steps are tried in registration order in a single pass, so they must be
    /// registered along the chain they form.
    ///
    /// # Errors
    ///
    /// `Unversioned` if this schema has no `version` field.
    pub fn add_migration<F>(
        &self,
        from_version: Option<&str>,
        to_version: &str,
        transform: F,
    ) -> ObjResult<()>
    where
        F: Fn(Mapping) -> Mapping + Send + Sync + 'static,
    {
        let mut def = self.write();
        if def.field(VERSION_FIELD).is_none() {
            return Err(ObjError::Unversioned {
                schema: def.name.clone(),
            });
        }
        def.migrations.register(from_version, to_version, transform);
        Ok(())
    }

    /// A copy of the registered migration steps
    pub fn migrations(&self) -> MigrationChain {
        self.read().migrations.clone()
    }

    /// Runs the migration chain on `mapping` towards this schema's version.
    ///
    /// Returns no outcome when the schema is unversioned or the mapping is
    /// already at the current version.
    pub fn migrate(&self, mapping: Mapping) -> (Option<MigrationOutcome>, Mapping) {
        match self.version() {
            Some(target) => self.migrations().resolve(mapping, &target),
            None => (None, mapping),
        }
    }

    /// Builds a new instance by deep-copying the defaults.
    ///
    /// # Errors
    ///
    /// - `InvalidVersion` if a nested schema, at any depth, declares `version`
    /// - `RecursiveSchema` if a schema contains itself through nested fields
    pub fn instantiate(&self) -> ObjResult<ObjectInstance> {
        let mut visiting = HashSet::new();
        self.build_instance(true, &mut visiting)
    }

    /// Builds a new instance, then writes each `(path, value)` override into
    /// it. Paths that name no field are skipped.
    pub fn instantiate_with<I, P>(&self, overrides: I) -> ObjResult<ObjectInstance>
    where
        I: IntoIterator<Item = (P, Value)>,
        P: Into<FieldPath>,
    {
        let mut obj = self.instantiate()?;
        obj.apply_initial_overrides(overrides)?;
        Ok(obj)
    }

    fn build_instance(
        &self,
        is_root: bool,
        visiting: &mut HashSet<*const RwLock<SchemaDef>>,
    ) -> ObjResult<ObjectInstance> {
        // Snapshot under the lock, recurse without holding it
        let (name, fields) = {
            let def = self.read();
            (def.name.clone(), def.fields.clone())
        };

        if !is_root && fields.iter().any(|f| f.name == VERSION_FIELD) {
            return Err(ObjError::InvalidVersion { schema: name });
        }

        visiting.insert(self.id());
        let mut slots = Vec::with_capacity(fields.len());
        for field in fields {
            let value = match field.default {
                FieldDefault::Scalar(value) => FieldValue::Scalar(value),
                FieldDefault::Nested(child) => {
                    if visiting.contains(&child.id()) {
                        return Err(ObjError::RecursiveSchema {
                            schema: name,
                            field: field.name,
                        });
                    }
                    FieldValue::Nested(child.build_instance(false, visiting)?)
                }
                FieldDefault::Custom(custom) => FieldValue::Custom(custom),
                FieldDefault::List { element, items } => {
                    FieldValue::List(ObjectList::from_items(&element, items)?)
                }
            };
            slots.push((field.name, value));
        }
        visiting.remove(&self.id());

        Ok(ObjectInstance::from_parts(self.clone(), slots))
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Schema {}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Nested schemas are listed by name only
        let (name, defs) = {
            let def = self.read();
            (def.name.clone(), def.fields.clone())
        };
        write!(f, "Schema({}) ", name)?;
        let mut fields = f.debug_map();
        for field in &defs {
            match &field.default {
                FieldDefault::Scalar(value) => fields.entry(&field.name, value),
                FieldDefault::Nested(schema) => fields.entry(&field.name, &schema.name()),
                FieldDefault::Custom(custom) => fields.entry(&field.name, custom),
                FieldDefault::List { element, .. } => {
                    fields.entry(&field.name, &format!("[{}]", element.name()))
                }
            };
        }
        fields.finish()
    }
}

/// Declares a schema field by field
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDef>,
}

impl SchemaBuilder {
    /// Declares the `version` field; only root schemas may have one
    pub fn version(self, version: impl Into<String>) -> Self {
        self.field(VERSION_FIELD, Value::String(version.into()))
    }

    /// Declares a scalar field
    pub fn field(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            default: FieldDefault::Scalar(default.into()),
        });
        self
    }

    /// Declares a nested object field
    pub fn nested(mut self, name: impl Into<String>, schema: &Schema) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            default: FieldDefault::Nested(schema.clone()),
        });
        self
    }

    /// Declares a custom-coded field
    pub fn custom<T: CustomValue + Clone>(mut self, name: impl Into<String>, default: T) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            default: FieldDefault::custom(default),
        });
        self
    }

    /// Declares an initially empty list of `element` instances
    pub fn list(mut self, name: impl Into<String>, element: &Schema) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            default: FieldDefault::list(element),
        });
        self
    }

    /// Declares a field with an explicit default
    pub fn with_default(mut self, name: impl Into<String>, default: FieldDefault) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            default,
        });
        self
    }

    /// Finishes the declaration.
    ///
    /// # Errors
    ///
    /// `InvalidFieldName` if a name is empty or contains the path separator,
    /// `DuplicateField` if two fields share a name.
    pub fn build(self) -> ObjResult<Schema> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() || field.name.contains('.') {
                return Err(ObjError::InvalidFieldName {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ObjError::DuplicateField {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        Ok(Schema {
            inner: Arc::new(RwLock::new(SchemaDef {
                name: self.name,
                fields: self.fields,
                migrations: MigrationChain::new(),
            })),
        })
    }
}
