//! Custom-coded field values
//!
//! Types the walker must not look into implement [`CustomValue`]. Any
//! `Clone` implementation automatically becomes [`CustomCoded`], the object
//! safe form stored inside instances.

use std::any::Any;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Rejection raised by [`CustomValue::decode`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct DecodeError(pub String);

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A field value with its own plain-value encoding.
///
/// `decode` mutates the existing value; the serializer never replaces a
/// custom value when loading.
pub trait CustomValue: fmt::Debug + Send + Sync + 'static {
    /// Converts the value to something JSON can hold
    fn encode(&self) -> Value;

    /// Loads the value from what [`encode`](CustomValue::encode) produced
    fn decode(&mut self, value: &Value) -> Result<(), DecodeError>;
}

/// Object-safe handle over a [`CustomValue`], with cloning and downcasting.
pub trait CustomCoded: CustomValue {
    fn clone_boxed(&self) -> Box<dyn CustomCoded>;
    fn type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: CustomValue + Clone> CustomCoded for T {
    fn clone_boxed(&self) -> Box<dyn CustomCoded> {
        Box::new(self.clone())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Clone for Box<dyn CustomCoded> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}
