//! CLI bootstrap - the composition root.
//!
//! Loads the package descriptor once and hands it to command handlers.

use anyhow::{Context, Result};
use cura_recipe_core::{PackageDescriptor, cura_descriptor};
use std::path::PathBuf;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Descriptor file; the built-in Cura descriptor when `None`.
    pub descriptor_path: Option<PathBuf>,
}

impl CliConfig {
    pub const fn new(descriptor_path: Option<PathBuf>) -> Self {
        Self { descriptor_path }
    }
}

/// Composed context for CLI commands.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub descriptor: PackageDescriptor,
}

/// Build the CLI context from configuration.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext> {
    let descriptor = match &config.descriptor_path {
        Some(path) => PackageDescriptor::load(path)
            .with_context(|| format!("Failed to load descriptor {}", path.display()))?,
        None => cura_descriptor(),
    };

    tracing::debug!(
        package = %descriptor.name,
        version = %descriptor.version,
        "Descriptor ready"
    );
    Ok(CliContext { descriptor })
}
