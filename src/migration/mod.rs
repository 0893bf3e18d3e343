//! Version migrations
//!
//! A versioned root schema carries a chain of steps that bring mappings
//! written by older versions up to its current version before they are
//! loaded. Migration failure is an outcome, not an error.

mod resolver;

pub use resolver::{
    declared_version, version_string, MigrationChain, MigrationOutcome, MigrationStep, Transform,
};
