//! Lock data handed to the external dependency resolver.

use cura_recipe_core::{PackageDescriptor, PropagatedOptions, ResolvedOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One dependency with the options it must be resolved with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedDependency {
    /// `name/version@user/channel`
    pub reference: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

/// Snapshot of one resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockFile {
    pub package: String,
    pub version: String,
    pub options: ResolvedOptions,
    /// Declaration order of the descriptor
    pub dependencies: Vec<LockedDependency>,
    pub build_requirements: Vec<String>,
}

impl LockFile {
    pub fn new(
        descriptor: &PackageDescriptor,
        options: &ResolvedOptions,
        propagated: &PropagatedOptions,
    ) -> Self {
        let dependencies = descriptor
            .dependencies
            .iter()
            .map(|dep| LockedDependency {
                reference: dep.to_string(),
                options: propagated
                    .for_dependency(&dep.name)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            package: descriptor.name.clone(),
            version: descriptor.version.clone(),
            options: options.clone(),
            dependencies,
            build_requirements: descriptor
                .build_requirements
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}
