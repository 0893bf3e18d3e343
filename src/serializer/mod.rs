//! Serializer
//!
//! Turns object instances into plain mappings, JSON text and files, and loads
//! them back. Loading migrates the raw mapping first, then validates it, then
//! writes it into the instance.

mod codec;
mod config;
mod mapping;

pub use codec::Serializer;
pub use config::{SerializerConfig, MAX_INDENT};

pub(crate) use mapping::{assign_plain, object_to_mapping};
