//! versioned_obj - Versioned object trees with defaults, filtered
//! serialization and single-pass version migration
//!
//! # Overview
//!
//! - [`schema`]: declare object shapes and build instances from them
//! - [`walker`]: breadth-first traversal of instances and plain mappings
//! - [`serializer`]: mapping, JSON and file conversion
//! - [`migration`]: bring old data up to the current schema version
//! - [`path`]: dotted field paths and include/exclude filters
//!
//! ```
//! use serde_json::json;
//! use versioned_obj::{PathFilter, Schema, Serializer};
//!
//! let display = Schema::builder("DisplayConfig")
//!     .field("display_mode", "windowed")
//!     .field("volume", 0.66)
//!     .build()
//!     .unwrap();
//! let config = Schema::builder("UserConfig")
//!     .version("1.0.0")
//!     .field("username", "john smith")
//!     .nested("display", &display)
//!     .build()
//!     .unwrap();
//!
//! let mut obj = config.instantiate().unwrap();
//! obj.set("display.volume", json!(1.0)).unwrap();
//!
//! let text = Serializer::new().to_json(&obj, &PathFilter::all()).unwrap();
//! let (loaded, _) = Serializer::new()
//!     .new_from_json(&config, &text, &PathFilter::all(), true)
//!     .unwrap();
//! assert_eq!(loaded, obj);
//! ```

pub mod cli;
pub mod errors;
pub mod migration;
pub mod path;
pub mod schema;
pub mod serializer;
pub mod value;
pub mod walker;

pub use errors::{ObjError, ObjResult};
pub use migration::{MigrationChain, MigrationOutcome};
pub use path::{FieldPath, PathFilter};
pub use schema::{FieldDefault, ObjectInstance, Schema, SchemaLoader};
pub use serializer::{Serializer, SerializerConfig};
pub use value::{CustomValue, DecodeError, FieldKind, FieldValue, Mapping, ObjectList};
