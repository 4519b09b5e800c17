//! Generate command handler.

use anyhow::Result;
use cura_recipe_runtime::BuildPlan;
use std::path::Path;

use super::{load_metadata, overrides};
use crate::bootstrap::CliContext;
use crate::commands::{MetadataArgs, OptionArgs};

/// Resolve the plan and write generated files into `output_dir`.
pub fn execute(
    ctx: &CliContext,
    options: &OptionArgs,
    metadata: &MetadataArgs,
    output_dir: &Path,
) -> Result<()> {
    let plan = BuildPlan::prepare(
        ctx.descriptor.clone(),
        &overrides(options)?,
        &load_metadata(metadata)?,
    )?;
    let files = plan.generate(output_dir)?;

    for path in files.paths() {
        println!("✓ Wrote {}", path.display());
    }
    Ok(())
}
