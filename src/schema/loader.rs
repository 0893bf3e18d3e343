//! Schema files
//!
//! Schemas can be declared in JSON files, one schema per file:
//!
//! ```json
//! {
//!   "name": "UserConfig",
//!   "version": "1.0.0",
//!   "fields": [
//!     {"kind": "scalar", "name": "username", "default": "john smith"},
//!     {"kind": "object", "name": "display", "schema": {"name": "DisplayConfig", "fields": []}},
//!     {"kind": "list", "name": "friends", "element": {"name": "Friend", "fields": []}}
//!   ]
//! }
//! ```
//!
//! Custom-coded fields only exist in code and cannot be declared in a file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::errors::{ObjError, ObjResult};

use super::types::Schema;

/// On-disk form of a schema
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDoc {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDoc>,
}

/// On-disk form of one field, tagged by `kind`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldDoc {
    Scalar {
        name: String,
        #[serde(default)]
        default: Value,
    },
    Object {
        name: String,
        schema: SchemaDoc,
    },
    List {
        name: String,
        element: SchemaDoc,
    },
}

impl SchemaDoc {
    /// Builds the declared schema, nested schemas included
    pub fn into_schema(self) -> ObjResult<Schema> {
        let mut builder = Schema::builder(self.name);
        if let Some(version) = self.version {
            builder = builder.version(version);
        }

        for field in self.fields {
            builder = match field {
                FieldDoc::Scalar { name, default } => builder.field(name, default),
                FieldDoc::Object { name, schema } => builder.nested(name, &schema.into_schema()?),
                FieldDoc::List { name, element } => builder.list(name, &element.into_schema()?),
            };
        }

        builder.build()
    }
}

/// Loads schema files and keeps the loaded schemas by name.
pub struct SchemaLoader {
    /// Directory containing schema files
    schema_dir: PathBuf,
    /// Loaded schemas indexed by name
    schemas: HashMap<String, Schema>,
}

impl SchemaLoader {
    /// Creates a loader for `*.json` schema files in `schema_dir`.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            schemas: HashMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Parses one schema from JSON text. `origin` names the source in errors.
    pub fn parse(text: &str, origin: &str) -> ObjResult<Schema> {
        let doc: SchemaDoc = serde_json::from_str(text).map_err(|e| ObjError::MalformedSchema {
            path: origin.to_string(),
            reason: format!("Invalid JSON: {}", e),
        })?;

        doc.into_schema().map_err(|e| match e {
            ObjError::DuplicateField { .. } | ObjError::InvalidFieldName { .. } => {
                ObjError::MalformedSchema {
                    path: origin.to_string(),
                    reason: e.to_string(),
                }
            }
            other => other,
        })
    }

    /// Reads and parses a single schema file.
    pub fn load_file(path: &Path) -> ObjResult<Schema> {
        let content = fs::read_to_string(path).map_err(|e| ObjError::MalformedSchema {
            path: path.display().to_string(),
            reason: format!("Failed to read file: {}", e),
        })?;

        Self::parse(&content, &path.display().to_string())
    }

    /// Loads every `*.json` file of the schema directory.
    ///
    /// A missing directory holds no schemas.
    pub fn load_all(&mut self) -> ObjResult<()> {
        if !self.schema_dir.exists() {
            return Ok(());
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| ObjError::MalformedSchema {
            path: self.schema_dir.display().to_string(),
            reason: format!("Failed to read schema directory: {}", e),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        // Directory order is platform dependent
        paths.sort();

        for path in paths {
            let schema = Self::load_file(&path)?;
            tracing::debug!(schema = %schema.name(), path = %path.display(), "loaded schema file");
            self.register(schema)?;
        }

        Ok(())
    }

    /// Registers a schema under its name.
    ///
    /// # Errors
    ///
    /// `MalformedSchema` if a schema with the same name is already registered.
    pub fn register(&mut self, schema: Schema) -> ObjResult<()> {
        let name = schema.name();
        if self.schemas.contains_key(&name) {
            return Err(ObjError::MalformedSchema {
                path: self.schema_dir.display().to_string(),
                reason: format!("Schema '{}' is already registered", name),
            });
        }

        self.schemas.insert(name, schema);
        Ok(())
    }

    /// Gets a schema by name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Returns the number of loaded schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}
