//! Env command handler.

use anyhow::Result;
use cura_recipe_core::render_environment;

use super::resolve;
use crate::bootstrap::CliContext;
use crate::commands::{EnvFormat, OptionArgs};

/// Print the rendered run environment.
pub fn execute(ctx: &CliContext, args: &OptionArgs, format: EnvFormat) -> Result<()> {
    let resolved = resolve(ctx, args)?;
    let environment = render_environment(&ctx.descriptor, &resolved);

    match format {
        EnvFormat::Shell => print!("{}", environment.to_shell_script()),
        EnvFormat::Batch => print!("{}", environment.to_batch_script()),
        EnvFormat::Json => println!("{}", serde_json::to_string_pretty(&environment)?),
    }
    Ok(())
}
