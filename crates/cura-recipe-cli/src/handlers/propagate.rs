//! Propagate command handler.

use anyhow::Result;
use cura_recipe_core::propagate_options;

use super::resolve;
use crate::bootstrap::CliContext;
use crate::commands::OptionArgs;

/// Print the options each dependency receives as `Dep:key = value`.
pub fn execute(ctx: &CliContext, args: &OptionArgs) -> Result<()> {
    let resolved = resolve(ctx, args)?;
    let propagated = propagate_options(&ctx.descriptor, &resolved);

    for entry in &propagated {
        for (name, value) in &entry.options {
            println!("{}:{name} = {value}", entry.dependency);
        }
    }
    Ok(())
}
