//! Options command handler.

use anyhow::Result;

use super::resolve;
use crate::bootstrap::CliContext;
use crate::commands::OptionArgs;

/// Print resolved options as `key = value`.
pub fn execute(ctx: &CliContext, args: &OptionArgs) -> Result<()> {
    let resolved = resolve(ctx, args)?;
    for (name, value) in resolved.iter() {
        println!("{name} = {value}");
    }
    Ok(())
}
