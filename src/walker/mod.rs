//! Dual-tree walker
//!
//! Two traversals over the same schema-defined shape:
//!
//! - [`walk_instance`]: leaf fields of a live instance, in schema order
//! - [`walk_mapping`]: leaf entries of a plain mapping, in key order, typed by
//!   a live instance
//!
//! Both consult the [`PathFilter`](crate::path::PathFilter) at leaves only.

mod instance_walk;
mod mapping_walk;

pub use instance_walk::{walk_instance, InstanceField, InstanceWalk};
pub use mapping_walk::{walk_mapping, MappingField};
