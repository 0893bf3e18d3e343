//! Field paths and path filtering
//!
//! - [`FieldPath`]: dotted address of a field at any nesting depth
//! - [`PathFilter`]: include/exclude prefix predicate used by every traversal

mod field_path;
mod filter;

pub use field_path::{insert_into_mapping, resolve, resolve_mut, FieldPath};
pub use filter::PathFilter;
