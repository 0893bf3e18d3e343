//! Error types for versioned objects
//!
//! Error codes:
//! - VOBJ_INVALID_VERSION (nested schema declares `version`)
//! - VOBJ_INVALID_FILTER (include and exclude used together)
//! - VOBJ_LOOKUP (unknown field path segment)
//! - VOBJ_INPUT_VALIDATION (extra or missing fields in input data)
//! - VOBJ_LOAD (JSON text could not be decoded)
//!
//! Migration failure is not an error. It is reported through
//! [`MigrationOutcome`](crate::migration::MigrationOutcome).

use thiserror::Error;

/// Result type for versioned object operations
pub type ObjResult<T> = Result<T, ObjError>;

/// Versioned object errors
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("Nested schema '{schema}' declares a 'version' field; only root objects may be versioned")]
    InvalidVersion { schema: String },

    #[error("Cannot use both include and exclude path filters")]
    InvalidFilter,

    #[error("Unrecognized attribute name '{segment}' in path '{path}'")]
    Lookup { path: String, segment: String },

    #[error("Input validation failed: {0}")]
    InputValidation(String),

    #[error("Failed to load object data: {0}")]
    Load(String),

    #[error("Cannot add migration to un-versioned schema '{schema}'. Add a 'version' field.")]
    Unversioned { schema: String },

    #[error("Duplicate field '{field}' in schema '{schema}'")]
    DuplicateField { schema: String, field: String },

    #[error("Invalid field name '{field}' in schema '{schema}': names must be non-empty and contain no '.'")]
    InvalidFieldName { schema: String, field: String },

    #[error("Schema '{schema}' contains itself through nested field '{field}'")]
    RecursiveSchema { schema: String, field: String },

    #[error("Field '{path}' expects {expected}, got {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Field '{path}' holds {expected}, cannot replace it with {found}")]
    SlotMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("List may only contain '{expected}' objects, got '{found}'")]
    ListElementMismatch { expected: String, found: String },

    #[error("List index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Custom value at '{path}' rejected input: {message}")]
    Decode { path: String, message: String },

    #[error("Malformed schema file '{path}': {reason}")]
    MalformedSchema { path: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ObjError {
    /// Creates a lookup error for `segment` within `path`.
    pub fn lookup(path: impl Into<String>, segment: impl Into<String>) -> Self {
        ObjError::Lookup {
            path: path.into(),
            segment: segment.into(),
        }
    }

    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ObjError::InvalidVersion { .. } => "VOBJ_INVALID_VERSION",
            ObjError::InvalidFilter => "VOBJ_INVALID_FILTER",
            ObjError::Lookup { .. } => "VOBJ_LOOKUP",
            ObjError::InputValidation(_) => "VOBJ_INPUT_VALIDATION",
            ObjError::Load(_) => "VOBJ_LOAD",
            ObjError::Unversioned { .. } => "VOBJ_UNVERSIONED",
            ObjError::DuplicateField { .. } => "VOBJ_DUPLICATE_FIELD",
            ObjError::InvalidFieldName { .. } => "VOBJ_INVALID_FIELD_NAME",
            ObjError::RecursiveSchema { .. } => "VOBJ_RECURSIVE_SCHEMA",
            ObjError::TypeMismatch { .. } => "VOBJ_TYPE_MISMATCH",
            ObjError::SlotMismatch { .. } => "VOBJ_SLOT_MISMATCH",
            ObjError::ListElementMismatch { .. } => "VOBJ_LIST_ELEMENT_MISMATCH",
            ObjError::IndexOutOfBounds { .. } => "VOBJ_INDEX_OUT_OF_BOUNDS",
            ObjError::Decode { .. } => "VOBJ_DECODE",
            ObjError::MalformedSchema { .. } => "VOBJ_MALFORMED_SCHEMA",
            ObjError::Config(_) => "VOBJ_CONFIG",
            ObjError::Io(_) => "VOBJ_IO",
        }
    }

    /// Returns whether this error was caused by the input data rather than
    /// by the schema declaration or the caller.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ObjError::Lookup { .. }
                | ObjError::InputValidation(_)
                | ObjError::Load(_)
                | ObjError::TypeMismatch { .. }
                | ObjError::Decode { .. }
        )
    }
}
