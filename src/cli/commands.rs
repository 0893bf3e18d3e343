//! CLI command implementations
//!
//! Each command reads a schema file, builds the default object and works on
//! it through the [`Serializer`]. Command functions return their output so
//! `run_command` is the only place that writes to stdout.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{ObjError, ObjResult};
use crate::path::PathFilter;
use crate::schema::{ObjectInstance, SchemaLoader};
use crate::serializer::{Serializer, SerializerConfig, MAX_INDENT};

use super::args::Command;
use super::io::{write_json, write_response};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Spaces per nesting level of printed objects (optional, default compact)
    #[serde(default)]
    pub indent: Option<usize>,

    /// Whether `load` and `get` validate data files (optional, default true)
    #[serde(default = "default_validate")]
    pub validate: bool,
}

fn default_validate() -> bool {
    true
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            indent: None,
            validate: default_validate(),
        }
    }
}

impl CliConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ObjResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ObjError::Config(format!("Failed to read config: {}", e)))?;

        let config: CliConfig = serde_json::from_str(&content)
            .map_err(|e| ObjError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> ObjResult<()> {
        if self.indent.map_or(false, |indent| indent > MAX_INDENT) {
            return Err(ObjError::Config(format!(
                "indent must be at most {}",
                MAX_INDENT
            )));
        }
        Ok(())
    }

    /// Serializer settings derived from this configuration
    pub fn serializer(&self) -> Serializer {
        Serializer::with_config(SerializerConfig {
            indent: self.indent,
        })
    }
}

/// Run a CLI command
pub fn run_command(command: Command, config: &CliConfig) -> ObjResult<()> {
    match command {
        Command::Defaults { schema, filter } => {
            let text = defaults(&schema, &filter.to_filter()?, config)?;
            write_json(&text)
        }
        Command::Validate {
            schema,
            data,
            filter,
        } => {
            let report = validate(&schema, &data, &filter.to_filter()?)?;
            write_response(report)
        }
        Command::Load {
            schema,
            data,
            filter,
            no_validate,
        } => {
            let text = load(&schema, &data, &filter.to_filter()?, config.validate && !no_validate, config)?;
            write_json(&text)
        }
        Command::Get { schema, data, path } => {
            let value = get(&schema, &data, &path, config)?;
            write_response(value)
        }
    }
}

/// JSON text of the default object of a schema file
pub fn defaults(schema_path: &Path, filter: &PathFilter, config: &CliConfig) -> ObjResult<String> {
    let schema = SchemaLoader::load_file(schema_path)?;
    let obj = schema.instantiate()?;
    config.serializer().to_json(&obj, filter)
}

/// Validates a data file against a schema file.
///
/// Reports whether the data would load; any mismatch is returned as an error.
pub fn validate(schema_path: &Path, data_path: &Path, filter: &PathFilter) -> ObjResult<Value> {
    let schema = SchemaLoader::load_file(schema_path)?;
    let obj = schema.instantiate()?;

    let text = fs::read_to_string(data_path)?;
    let mapping = Serializer::parse_json(&text)?;
    let (outcome, mapping) = schema.migrate(mapping);
    if let Some(outcome) = outcome.as_ref().filter(|o| !o.success) {
        return Err(ObjError::InputValidation(format!("Migration failed: {}", outcome)));
    }

    Serializer::new().validate(&obj, &mapping, filter)?;

    Ok(json!({
        "schema": schema.name(),
        "valid": true,
        "migration": outcome,
    }))
}

/// JSON text of a data file loaded over the schema defaults
pub fn load(
    schema_path: &Path,
    data_path: &Path,
    filter: &PathFilter,
    validate: bool,
    config: &CliConfig,
) -> ObjResult<String> {
    let obj = load_object(schema_path, data_path, filter, validate, config)?;
    config.serializer().to_json(&obj, &PathFilter::all())
}

/// Plain value of one field of a loaded data file
pub fn get(schema_path: &Path, data_path: &Path, path: &str, config: &CliConfig) -> ObjResult<Value> {
    let obj = load_object(schema_path, data_path, &PathFilter::all(), config.validate, config)?;
    Ok(obj.get(path)?.to_plain())
}

fn load_object(
    schema_path: &Path,
    data_path: &Path,
    filter: &PathFilter,
    validate: bool,
    config: &CliConfig,
) -> ObjResult<ObjectInstance> {
    let schema = SchemaLoader::load_file(schema_path)?;
    let (obj, outcome) = config
        .serializer()
        .new_from_file(&schema, data_path, filter, validate)?;

    match outcome {
        Some(outcome) if !outcome.success => Err(ObjError::InputValidation(format!(
            "Migration failed: {}",
            outcome
        ))),
        Some(outcome) => {
            tracing::info!(%outcome, "data file migrated");
            Ok(obj)
        }
        None => Ok(obj),
    }
}
