//! Launchers command handler.

use anyhow::{Context, Result};
use cura_recipe_core::render_environment;
use cura_recipe_runtime::{LauncherTarget, render_launchers};
use std::path::Path;

use super::resolve;
use crate::bootstrap::CliContext;
use crate::commands::OptionArgs;

/// Render one launcher per target from `template`.
pub fn execute(
    ctx: &CliContext,
    options: &OptionArgs,
    template: &Path,
    targets: &[String],
    output_dir: &Path,
) -> Result<()> {
    let targets = targets
        .iter()
        .map(|raw| raw.parse::<LauncherTarget>())
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to parse launcher targets")?;

    let resolved = resolve(ctx, options)?;
    let environment = render_environment(&ctx.descriptor, &resolved);

    for path in render_launchers(template, &targets, &environment, output_dir)? {
        println!("✓ Wrote {}", path.display());
    }
    Ok(())
}
