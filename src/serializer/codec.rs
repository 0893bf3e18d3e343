//! Mapping, JSON and file conversion for object instances

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::errors::{ObjError, ObjResult};
use crate::migration::MigrationOutcome;
use crate::path::PathFilter;
use crate::schema::{ObjectInstance, Schema};
use crate::value::{json_type_name, Mapping};

use super::config::SerializerConfig;
use super::mapping::{load_mapping, object_to_mapping, validate_mapping};

/// Converts object instances to and from mappings, JSON text and files.
///
/// Every load follows the same order: migrate, validate, then write into the
/// instance. Nothing is written when migration or validation fails.
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    config: SerializerConfig,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Mapping form of `obj`. Custom values are encoded, lists become arrays
    /// of mappings.
    pub fn to_mapping(&self, obj: &ObjectInstance, filter: &PathFilter) -> Mapping {
        object_to_mapping(obj, filter)
    }

    /// Checks `mapping` against the fields of `obj` without loading it.
    ///
    /// # Errors
    ///
    /// `InputValidation` if the mapping has a field `obj` lacks, or lacks one
    /// `obj` has. The root `version` field is exempt.
    pub fn validate(&self, obj: &ObjectInstance, mapping: &Mapping, filter: &PathFilter) -> ObjResult<()> {
        validate_mapping(obj, mapping, filter)
    }

    /// Loads `mapping` into `obj`.
    ///
    /// Returns the migration outcome when the mapping's version differed from
    /// the object's. A failed outcome leaves `obj` untouched.
    pub fn from_mapping(
        &self,
        obj: &mut ObjectInstance,
        mapping: &Mapping,
        filter: &PathFilter,
        validate: bool,
    ) -> ObjResult<Option<MigrationOutcome>> {
        load_mapping(obj, mapping.clone(), filter, validate)
    }

    /// JSON text of `obj`, indented per the configuration
    pub fn to_json(&self, obj: &ObjectInstance, filter: &PathFilter) -> ObjResult<String> {
        let value = Value::Object(self.to_mapping(obj, filter));

        let Some(indent) = self.config.indent else {
            return Ok(serde_json::to_string(&value).map_err(io::Error::from)?);
        };

        let indent = " ".repeat(indent);
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
        value.serialize(&mut ser).map_err(io::Error::from)?;

        String::from_utf8(buf).map_err(|e| ObjError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    /// Parses JSON text into a mapping.
    ///
    /// # Errors
    ///
    /// `Load` if the text is not JSON or its top level is not an object.
    pub fn parse_json(text: &str) -> ObjResult<Mapping> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            tracing::debug!(error = %e, "JSON decode failure");
            ObjError::Load("JSON decode failure".to_string())
        })?;

        match value {
            Value::Object(mapping) => Ok(mapping),
            other => Err(ObjError::Load(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Loads JSON text into `obj`.
    ///
    /// # Errors
    ///
    /// `Load` if the text is not JSON or its top level is not an object, plus
    /// everything [`from_mapping`](Self::from_mapping) returns.
    pub fn from_json(
        &self,
        obj: &mut ObjectInstance,
        text: &str,
        filter: &PathFilter,
        validate: bool,
    ) -> ObjResult<Option<MigrationOutcome>> {
        let mapping = Self::parse_json(text)?;
        load_mapping(obj, mapping, filter, validate)
    }

    /// Writes the JSON text of `obj` to `path`, replacing the file
    pub fn to_file(&self, obj: &ObjectInstance, path: &Path, filter: &PathFilter) -> ObjResult<()> {
        let text = self.to_json(obj, filter)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Loads the JSON file at `path` into `obj`
    pub fn from_file(
        &self,
        obj: &mut ObjectInstance,
        path: &Path,
        filter: &PathFilter,
        validate: bool,
    ) -> ObjResult<Option<MigrationOutcome>> {
        let text = fs::read_to_string(path)?;
        self.from_json(obj, &text, filter, validate)
    }

    /// Instantiates `schema` and loads `mapping` into the new instance
    pub fn new_from_mapping(
        &self,
        schema: &Schema,
        mapping: &Mapping,
        filter: &PathFilter,
        validate: bool,
    ) -> ObjResult<(ObjectInstance, Option<MigrationOutcome>)> {
        let mut obj = schema.instantiate()?;
        let outcome = self.from_mapping(&mut obj, mapping, filter, validate)?;
        Ok((obj, outcome))
    }

    /// Instantiates `schema` and loads JSON text into the new instance
    pub fn new_from_json(
        &self,
        schema: &Schema,
        text: &str,
        filter: &PathFilter,
        validate: bool,
    ) -> ObjResult<(ObjectInstance, Option<MigrationOutcome>)> {
        let mut obj = schema.instantiate()?;
        let outcome = self.from_json(&mut obj, text, filter, validate)?;
        Ok((obj, outcome))
    }

    /// Instantiates `schema` and loads a JSON file into the new instance
    pub fn new_from_file(
        &self,
        schema: &Schema,
        path: &Path,
        filter: &PathFilter,
        validate: bool,
    ) -> ObjResult<(ObjectInstance, Option<MigrationOutcome>)> {
        let mut obj = schema.instantiate()?;
        let outcome = self.from_file(&mut obj, path, filter, validate)?;
        Ok((obj, outcome))
    }

    /// Rebuilds `obj` from its schema's current defaults
    pub fn reset_to_defaults(&self, obj: &mut ObjectInstance) -> ObjResult<()> {
        obj.reset_to_defaults()
    }
}
