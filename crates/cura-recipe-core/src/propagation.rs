//! Option propagation onto dependencies.
//!
//! Produces the per-dependency option values the external resolver must apply
//! before it fetches or builds anything. Nothing is mutated here.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::descriptor::PackageDescriptor;
use crate::options::ResolvedOptions;

/// Option values forwarded to one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyOptions {
    pub dependency: String,
    pub options: BTreeMap<String, String>,
}

/// Propagated options for every dependency with a propagation rule, in
/// dependency declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropagatedOptions(Vec<DependencyOptions>);

impl PropagatedOptions {
    /// Options forwarded to `dependency`, if it has a propagation rule.
    pub fn for_dependency(&self, dependency: &str) -> Option<&BTreeMap<String, String>> {
        self.0
            .iter()
            .find(|entry| entry.dependency == dependency)
            .map(|entry| &entry.options)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DependencyOptions> {
        self.0.iter()
    }

    /// Dependency names in output order.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|entry| entry.dependency.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a PropagatedOptions {
    type Item = &'a DependencyOptions;
    type IntoIter = std::slice::Iter<'a, DependencyOptions>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Map resolved options onto the dependencies named in the propagation rules.
///
/// Options with no resolved value are skipped for that dependency.
pub fn propagate_options(
    descriptor: &PackageDescriptor,
    resolved: &ResolvedOptions,
) -> PropagatedOptions {
    let entries = descriptor
        .dependencies
        .iter()
        .filter_map(|dep| {
            let keys = descriptor.option_propagation.get(&dep.name)?;
            let options = keys
                .iter()
                .filter_map(|key| {
                    let value = resolved.get(key);
                    if value.is_none() {
                        tracing::warn!(
                            dependency = %dep.name,
                            option = %key,
                            "Skipping propagation of option without a value"
                        );
                    }
                    value.map(|v| (key.clone(), v.to_string()))
                })
                .collect();
            Some(DependencyOptions {
                dependency: dep.name.clone(),
                options,
            })
        })
        .collect();

    PropagatedOptions(entries)
}
