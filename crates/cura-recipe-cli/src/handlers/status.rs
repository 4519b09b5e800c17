//! Status command handler.

use anyhow::Result;
use cura_recipe_runtime::{BUILD_RECORD_FILE, BuildRecord};
use std::path::Path;

/// Print the last build record found in `output_dir`.
pub fn execute(output_dir: &Path) -> Result<()> {
    let path = output_dir.join(BUILD_RECORD_FILE);
    if !path.exists() {
        println!("No build recorded in {}", output_dir.display());
        return Ok(());
    }

    let record = BuildRecord::load(&path)?;
    println!("{} {} ({})", record.package, record.version, record.build_type);
    println!("  built:   {}", record.build_date.format("%Y-%m-%d %H:%M:%S UTC"));
    let steps: Vec<_> = record.steps.iter().map(ToString::to_string).collect();
    println!("  steps:   {}", steps.join(" -> "));
    for (name, value) in record.options.iter() {
        println!("  {name} = {value}");
    }
    Ok(())
}
