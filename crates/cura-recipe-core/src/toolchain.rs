//! Toolchain variables and CMake toolchain file rendering.

use serde::Serialize;

use crate::descriptor::{PackageDescriptor, VariableSource};
use crate::error::{RecipeError, RecipeResult};
use crate::metadata::DependencyMetadata;
use crate::options::ResolvedOptions;

/// A resolved toolchain variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainValue {
    pub name: String,
    pub value: String,
}

/// Resolve every toolchain variable the descriptor declares, in declaration order.
pub fn toolchain_variables(
    descriptor: &PackageDescriptor,
    resolved: &ResolvedOptions,
    metadata: &DependencyMetadata,
) -> RecipeResult<Vec<ToolchainValue>> {
    descriptor
        .toolchain_variables
        .iter()
        .map(|variable| {
            let value = match &variable.source {
                VariableSource::Option(option) => {
                    resolved
                        .get(option)
                        .ok_or_else(|| RecipeError::MissingOptionValue {
                            name: option.clone(),
                        })?
                }
                VariableSource::DependencyMetadata { dependency, key } => {
                    metadata.lookup(dependency, key)?
                }
            };
            Ok(ToolchainValue {
                name: variable.name.clone(),
                value: value.to_string(),
            })
        })
        .collect()
}

/// Render a CMake toolchain script that caches every variable.
pub fn render_toolchain_file(package: &str, variables: &[ToolchainValue]) -> String {
    let mut script = format!("# Toolchain variables for {package}\n");
    for variable in variables {
        script.push_str(&format!(
            "set({} \"{}\" CACHE STRING \"\" FORCE)\n",
            variable.name,
            escape_cmake(&variable.value)
        ));
    }
    script
}

fn escape_cmake(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '"' | '$' | ';' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
