//! Include/exclude path filter
//!
//! Matching is by textual prefix of the dotted field name, not by segment:
//! an include entry of `var1` also selects `var10`. The filter is consulted
//! only for leaf fields, so a prefix naming a nested object selects its whole
//! subtree.

use crate::errors::{ObjError, ObjResult};

/// Include/exclude predicate over dotted field names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl PathFilter {
    /// Creates a filter from include and exclude prefix lists.
    ///
    /// # Errors
    ///
    /// `InvalidFilter` if both lists are non-empty.
    pub fn new<I, E, S, T>(include: I, exclude: E) -> ObjResult<Self>
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let include: Vec<String> = include.into_iter().map(Into::into).collect();
        let exclude: Vec<String> = exclude.into_iter().map(Into::into).collect();

        if !include.is_empty() && !exclude.is_empty() {
            return Err(ObjError::InvalidFilter);
        }

        Ok(Self { include, exclude })
    }

    /// Filter that selects every field
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter that selects only fields starting with one of `prefixes`
    pub fn only<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: prefixes.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
        }
    }

    /// Filter that skips fields starting with one of `prefixes`
    pub fn ignore<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: Vec::new(),
            exclude: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn include(&self) -> &[String] {
        &self.include
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// Decides whether the leaf field with dotted name `path` takes part in
    /// a traversal.
    pub fn should_include(&self, path: &str) -> bool {
        if !self.include.is_empty() {
            return self.include.iter().any(|prefix| path.starts_with(prefix.as_str()));
        }

        !self.exclude.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}
