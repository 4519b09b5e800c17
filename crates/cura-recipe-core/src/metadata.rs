//! Metadata exposed by resolved dependencies.
//!
//! The external resolver publishes a fixed set of keys per dependency. Lookups
//! that miss are [`RecipeError::MissingDependencyMetadata`], never a silent
//! empty value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{RecipeError, RecipeResult};

/// Dependency name -> metadata key -> value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyMetadata(BTreeMap<String, BTreeMap<String, String>>);

impl DependencyMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one value. Replaces any previous value for the same key.
    pub fn insert(
        &mut self,
        dependency: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.0
            .entry(dependency.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Look up `dependency.key`.
    pub fn lookup(&self, dependency: &str, key: &str) -> RecipeResult<&str> {
        self.0
            .get(dependency)
            .and_then(|keys| keys.get(key))
            .map(String::as_str)
            .ok_or_else(|| RecipeError::MissingDependencyMetadata {
                dependency: dependency.to_string(),
                key: key.to_string(),
            })
    }

    /// Fold `other` into this set; its values win.
    pub fn merge(&mut self, other: Self) {
        for (dependency, keys) in other.0 {
            self.0.entry(dependency).or_default().extend(keys);
        }
    }

    /// Load metadata from a JSON file of the form `{"Dep": {"KEY": "value"}}`.
    pub fn load(path: &Path) -> RecipeResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Parse a `Dep.KEY=value` assignment.
    pub fn parse_assignment(raw: &str) -> RecipeResult<(String, String, String)> {
        let invalid = || RecipeError::InvalidReference(raw.to_string());
        let (target, value) = raw.split_once('=').ok_or_else(invalid)?;
        let (dependency, key) = target.trim().split_once('.').ok_or_else(invalid)?;
        if dependency.is_empty() || key.is_empty() {
            return Err(invalid());
        }
        Ok((dependency.to_string(), key.to_string(), value.to_string()))
    }
}
