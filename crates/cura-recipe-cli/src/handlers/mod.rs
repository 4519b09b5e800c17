//! Command handlers.
//!
//! Each handler resolves what it needs from the descriptor in [`CliContext`]
//! and prints the result.
//!
//! [`CliContext`]: crate::bootstrap::CliContext

pub mod build;
pub mod env;
pub mod generate;
pub mod inspect;
pub mod launchers;
pub mod options;
pub mod propagate;
pub mod status;

use anyhow::{Context, Result};
use cura_recipe_core::{DependencyMetadata, ResolvedOptions, parse_overrides, resolve_options};
use std::collections::BTreeMap;

use crate::bootstrap::CliContext;
use crate::commands::{MetadataArgs, OptionArgs};

/// Parse `-o key=value` flags.
pub fn overrides(args: &OptionArgs) -> Result<BTreeMap<String, String>> {
    Ok(parse_overrides(&args.options)?)
}

/// Resolve the descriptor's options with the given overrides.
pub fn resolve(ctx: &CliContext, args: &OptionArgs) -> Result<ResolvedOptions> {
    Ok(resolve_options(&ctx.descriptor, &overrides(args)?)?)
}

/// Collect dependency metadata from a JSON file and `--dep-info` flags.
///
/// Flag values win over file values.
pub fn load_metadata(args: &MetadataArgs) -> Result<DependencyMetadata> {
    let mut metadata = match &args.metadata {
        Some(path) => DependencyMetadata::load(path)
            .with_context(|| format!("Failed to load dependency metadata {}", path.display()))?,
        None => DependencyMetadata::new(),
    };

    let mut flags = DependencyMetadata::new();
    for raw in &args.dep_info {
        let (dependency, key, value) = DependencyMetadata::parse_assignment(raw)?;
        flags.insert(dependency, key, value);
    }
    metadata.merge(flags);
    Ok(metadata)
}
