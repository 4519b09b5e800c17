//! Build command handler.
//!
//! Runs the whole pipeline: resolve, propagate, generate files, then drive
//! CMake through configure, build and install.

use anyhow::Result;
use cura_recipe_runtime::{BuildPlan, CMakeConfig, CMakeDriver};
use std::path::PathBuf;

use super::{load_metadata, overrides};
use crate::bootstrap::CliContext;
use crate::commands::{MetadataArgs, OptionArgs};

/// Arguments for the build command.
#[derive(Debug, Clone)]
pub struct BuildArgs {
    pub overrides: OptionArgs,
    pub metadata: MetadataArgs,
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub output_dir: PathBuf,
    pub build_type: String,
    pub install_prefix: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub dry_run: bool,
}

/// Execute the build command.
pub fn execute(ctx: &CliContext, args: BuildArgs) -> Result<()> {
    let plan = BuildPlan::prepare(
        ctx.descriptor.clone(),
        &overrides(&args.overrides)?,
        &load_metadata(&args.metadata)?,
    )?;
    let files = plan.generate(&args.output_dir)?;
    println!("✓ Generated files in {}", args.output_dir.display());

    let mut config = CMakeConfig::new(&args.source_dir, &args.build_dir)
        .with_toolchain_file(&files.toolchain_file)
        .with_build_type(&args.build_type)
        .with_environment(plan.environment.clone());
    if let Some(prefix) = &args.install_prefix {
        config = config.with_install_prefix(prefix);
    }
    if let Some(jobs) = args.jobs {
        config = config.with_jobs(jobs);
    }

    if args.dry_run {
        println!();
        println!("Dry run, CMake not invoked. Would run:");
        println!("  {} {}", config.program, config.configure_args().join(" "));
        println!("  {} {}", config.program, config.build_args().join(" "));
        println!("  {} {}", config.program, config.install_args().join(" "));
        return Ok(());
    }

    println!();
    println!(
        "Building {} {} ({})...",
        plan.descriptor.name, plan.descriptor.version, args.build_type
    );
    println!();

    let mut driver = CMakeDriver::new(config);
    let record = plan.execute(&mut driver, &args.build_type, &args.output_dir)?;

    println!();
    println!(
        "✓ Build completed successfully ({} steps)",
        record.steps.len()
    );
    Ok(())
}
