//! The package descriptor: identity, options, dependencies and the contracts
//! that tie them together.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::builtin::{ENTERPRISE_OPTION, STAGING_OPTION};
use crate::error::{RecipeError, RecipeResult};
use crate::options::OptionDomain;

/// A versioned requirement on another package: `name/version@user/channel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRequirement {
    pub name: String,
    pub version: String,
    pub user: String,
    pub channel: String,
}

impl DependencyRequirement {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        user: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            user: user.into(),
            channel: channel.into(),
        }
    }
}

impl fmt::Display for DependencyRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}@{}/{}",
            self.name, self.version, self.user, self.channel
        )
    }
}

impl FromStr for DependencyRequirement {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RecipeError::InvalidReference(s.to_string());
        let (package, owner) = s.split_once('@').ok_or_else(invalid)?;
        let (name, version) = package.split_once('/').ok_or_else(invalid)?;
        let (user, channel) = owner.split_once('/').ok_or_else(invalid)?;

        let parts = [name, version, user, channel];
        if parts.iter().any(|p| p.is_empty() || p.contains(['/', '@'])) {
            return Err(invalid());
        }
        Ok(Self::new(name, version, user, channel))
    }
}

/// A tool needed only at build time, e.g. `cmake/[>=3.16.2]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRequirement {
    pub name: String,
    /// Version or version range, passed through verbatim
    pub version: String,
}

impl fmt::Display for BuildRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// Where a toolchain variable takes its value from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableSource {
    /// A resolved option of this package
    Option(String),
    /// A metadata key exposed by a resolved dependency
    DependencyMetadata { dependency: String, key: String },
}

/// A variable handed opaquely to the toolchain generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainVariable {
    pub name: String,
    pub source: VariableSource,
}

/// Declarative package record consumed for one build invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    pub name: String,
    pub version: String,
    pub license: String,
    pub author: String,
    pub url: String,
    pub description: String,
    #[serde(default)]
    pub topics: Vec<String>,

    pub options: BTreeMap<String, OptionDomain>,
    #[serde(default)]
    pub default_options: BTreeMap<String, String>,

    /// Declaration order is preserved in every generated artifact
    pub dependencies: Vec<DependencyRequirement>,
    #[serde(default)]
    pub build_requirements: Vec<BuildRequirement>,

    /// Dependency name -> own option keys forwarded to that dependency
    #[serde(default)]
    pub option_propagation: BTreeMap<String, Vec<String>>,

    /// Dependency name -> metadata keys it may expose
    #[serde(default)]
    pub dependency_metadata: BTreeMap<String, BTreeSet<String>>,

    #[serde(default)]
    pub toolchain_variables: Vec<ToolchainVariable>,
}

impl PackageDescriptor {
    /// Look up a dependency by name.
    pub fn dependency(&self, name: &str) -> Option<&DependencyRequirement> {
        self.dependencies.iter().find(|d| d.name == name)
    }

    /// Check the structural invariants of the descriptor.
    pub fn validate(&self) -> RecipeResult<()> {
        let mut seen = HashSet::new();
        for dep in &self.dependencies {
            if !seen.insert(dep.name.as_str()) {
                return Err(RecipeError::invalid_descriptor(format_args!(
                    "dependency '{}' is declared more than once",
                    dep.name
                )));
            }
        }

        for (name, value) in &self.default_options {
            let Some(domain) = self.options.get(name) else {
                return Err(RecipeError::invalid_descriptor(format_args!(
                    "default given for undeclared option '{name}'"
                )));
            };
            if !domain.contains(value) {
                return Err(RecipeError::invalid_descriptor(format_args!(
                    "default '{value}' for option '{name}' is not a canonical member of {domain}"
                )));
            }
        }

        // Read as flags when rendering the run environment.
        for flag in [ENTERPRISE_OPTION, STAGING_OPTION] {
            if let Some(domain) = self.options.get(flag)
                && *domain != OptionDomain::Boolean
            {
                return Err(RecipeError::invalid_descriptor(format_args!(
                    "option '{flag}' must be boolean, found {domain}"
                )));
            }
        }

        for (dependency, keys) in &self.option_propagation {
            if self.dependency(dependency).is_none() {

                return Err(RecipeError::invalid_descriptor(format_args!(
                    "options propagated to undeclared dependency '{dependency}'"
                )));
            }
            if let Some(key) = keys.iter().find(|k| !self.options.contains_key(*k)) {
                return Err(RecipeError::invalid_descriptor(format_args!(
                    "undeclared option '{key}' propagated to '{dependency}'"
                )));
            }
        }

        if let Some(dependency) = self
            .dependency_metadata
            .keys()
            .find(|d| !seen.contains(d.as_str()))
        {
            return Err(RecipeError::invalid_descriptor(format_args!(
                "metadata declared for undeclared dependency '{dependency}'"
            )));
        }

        for variable in &self.toolchain_variables {
            match &variable.source {
                VariableSource::Option(option) if !self.options.contains_key(option) => {
                    return Err(RecipeError::invalid_descriptor(format_args!(
                        "toolchain variable '{}' reads undeclared option '{option}'",
                        variable.name
                    )));
                }
                VariableSource::DependencyMetadata { dependency, key }
                    if !self
                        .dependency_metadata
                        .get(dependency)
                        .is_some_and(|keys| keys.contains(key)) =>
                {
                    return Err(RecipeError::invalid_descriptor(format_args!(
                        "toolchain variable '{}' reads '{dependency}.{key}' which is not in the metadata contract",
                        variable.name
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Parse and validate a descriptor from JSON text.
    pub fn from_json(json: &str) -> RecipeResult<Self> {
        let descriptor: Self = serde_json::from_str(json)?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Load and validate a descriptor from a JSON file.
    pub fn load(path: &Path) -> RecipeResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let descriptor = Self::from_json(&json)?;
        tracing::debug!(
            path = %path.display(),
            package = %descriptor.name,
            version = %descriptor.version,
            "Loaded package descriptor"
        );
        Ok(descriptor)
    }

    /// Save the descriptor as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> RecipeResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
