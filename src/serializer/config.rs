//! Serializer configuration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ObjError, ObjResult};

/// Widest indent accepted for JSON output
pub const MAX_INDENT: usize = 16;

/// Output settings for JSON text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializerConfig {
    /// Spaces per nesting level; `None` writes everything on one line
    #[serde(default)]
    pub indent: Option<usize>,
}

impl SerializerConfig {
    /// Config with the given indent
    pub fn indented(indent: usize) -> Self {
        Self {
            indent: Some(indent),
        }
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> ObjResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ObjError::Config(format!("Failed to read config: {}", e)))?;

        let config: SerializerConfig = serde_json::from_str(&content)
            .map_err(|e| ObjError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> ObjResult<()> {
        if let Some(indent) = self.indent {
            if indent > MAX_INDENT {
                return Err(ObjError::Config(format!(
                    "indent must be at most {}, got {}",
                    MAX_INDENT, indent
                )));
            }
        }
        Ok(())
    }
}
