//! Inspect command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;

/// Print identity, option domains with defaults, and dependencies.
pub fn execute(ctx: &CliContext) -> Result<()> {
    let d = &ctx.descriptor;

    println!("{} {}", d.name, d.version);
    println!("  {}", d.description);
    println!("  license: {}", d.license);
    println!("  author:  {}", d.author);
    println!("  url:     {}", d.url);
    if !d.topics.is_empty() {
        println!("  topics:  {}", d.topics.join(", "));
    }

    println!();
    println!("Options:");
    for (name, domain) in &d.options {
        let default = d.default_options.get(name).map_or("-", String::as_str);
        let domain = domain.to_string();
        println!("  {name:<16} {domain:<16} default: {default}");
    }

    println!();
    println!("Requires:");
    for dep in &d.dependencies {
        println!("  {dep}");
    }

    if !d.build_requirements.is_empty() {
        println!();
        println!("Build requires:");
        for req in &d.build_requirements {
            println!("  {req}");
        }
    }

    Ok(())
}
