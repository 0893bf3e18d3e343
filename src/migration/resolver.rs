//! Single-pass migration chain
//!
//! Steps are scanned once, in registration order. A step runs when its source
//! version equals the version reached so far, so a chain only works when its
//! steps were registered in the order they apply. Branching chains and
//! out-of-order registration leave steps unreachable.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::schema::VERSION_FIELD;
use crate::value::Mapping;

/// Transform applied to a mapping by one migration step
pub type Transform = Arc<dyn Fn(Mapping) -> Mapping + Send + Sync>;

/// One registered version transition
#[derive(Clone)]
pub struct MigrationStep {
    /// Source version; `None` matches data without a version
    pub from_version: Option<String>,
    pub to_version: String,
    pub transform: Transform,
}

impl fmt::Debug for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationStep")
            .field("from_version", &self.from_version)
            .field("to_version", &self.to_version)
            .finish_non_exhaustive()
    }
}

/// Result of running a migration chain.
///
/// Only produced when the data's version differed from the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationOutcome {
    /// Version declared by the input data; `None` for unversioned data
    pub old_version: Option<String>,
    pub target_version: String,
    /// Version the data was left at when the scan ended
    pub version_reached: Option<String>,
    pub success: bool,
}

impl fmt::Display for MigrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let old = self.old_version.as_deref().unwrap_or("unversioned");
        let reached = self.version_reached.as_deref().unwrap_or("unversioned");
        if self.success {
            write!(f, "migrated from {} to {}", old, self.target_version)
        } else {
            write!(
                f,
                "failed to migrate from {} to {} (stopped at {})",
                old, self.target_version, reached
            )
        }
    }
}

/// Ordered list of migration steps for one schema
#[derive(Debug, Clone, Default)]
pub struct MigrationChain {
    steps: Vec<MigrationStep>,
}

impl MigrationChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step to the end of the chain
    pub fn register<F>(&mut self, from_version: Option<&str>, to_version: &str, transform: F)
    where
        F: Fn(Mapping) -> Mapping + Send + Sync + 'static,
    {
        self.steps.push(MigrationStep {
            from_version: from_version.map(str::to_string),
            to_version: to_version.to_string(),
            transform: Arc::new(transform),
        });
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[MigrationStep] {
        &self.steps
    }

    /// Brings `mapping` from its declared version towards `target`.
    ///
    /// Returns `(None, mapping)` untouched when the declared version already
    /// equals `target`. Otherwise every matching step is applied during one
    /// pass and the outcome reports where the data ended up. Failure to reach
    /// `target` is reported through `success`, never as an error.
    pub fn resolve(&self, mut mapping: Mapping, target: &str) -> (Option<MigrationOutcome>, Mapping) {
        let declared = declared_version(&mapping);
        if declared.as_deref() == Some(target) {
            return (None, mapping);
        }

        let mut current = declared.clone();
        for step in &self.steps {
            if current.as_deref() == Some(target) {
                break;
            }
            if step.from_version != current {
                continue;
            }

            mapping = (step.transform)(mapping);
            tracing::debug!(
                from = step.from_version.as_deref().unwrap_or("unversioned"),
                to = %step.to_version,
                "applied migration step"
            );
            current = Some(step.to_version.clone());
        }

        let outcome = MigrationOutcome {
            old_version: declared,
            target_version: target.to_string(),
            success: current.as_deref() == Some(target),
            version_reached: current,
        };

        if !outcome.success {
            tracing::warn!(%outcome, "migration chain did not reach target version");
        }

        (Some(outcome), mapping)
    }
}

/// The version a mapping declares through its `version` key
pub fn declared_version(mapping: &Mapping) -> Option<String> {
    mapping.get(VERSION_FIELD).and_then(version_string)
}

/// Text form of a version value. `null` means unversioned; non-string values
/// use their JSON text.
pub fn version_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
