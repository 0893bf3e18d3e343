//! Schemas and object instances
//!
//! A schema is declared once, in code or in a schema file, and produces any
//! number of independent instances.
//!
//! # Rules
//!
//! - Field order is declaration order
//! - Only a root schema may declare `version`
//! - A field's variant comes from its declaration
//! - Instances never share mutable state with defaults or with each other

mod instance;
mod loader;
mod types;

pub use instance::ObjectInstance;
pub use loader::{FieldDoc, SchemaDoc, SchemaLoader};
pub use types::{FieldDef, FieldDefault, Schema, SchemaBuilder, VERSION_FIELD};
