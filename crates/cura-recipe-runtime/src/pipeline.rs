//! End-to-end recipe pipeline.
//!
//! `prepare` resolves everything in memory, `generate` writes the files the
//! external tools read, `execute` drives the build and records it. Any error
//! aborts the run; files already written stay where they are.

use anyhow::Result;
use cura_recipe_core::{
    BuildStep, DependencyMetadata, PackageDescriptor, PropagatedOptions, RecipeResult,
    ResolvedOptions, RunEnvironment, ToolchainDriver, ToolchainValue, invoke_build,
    propagate_options, render_environment, resolve_options, toolchain_variables,
};
use std::collections::BTreeMap;
use std::path::Path;

use crate::generate::{GeneratedFiles, write_generated_files};
use crate::lock::LockFile;
use crate::record::BuildRecord;

/// Everything resolved for one invocation, before any file is written.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub descriptor: PackageDescriptor,
    pub options: ResolvedOptions,
    pub propagated: PropagatedOptions,
    pub toolchain: Vec<ToolchainValue>,
    pub environment: RunEnvironment,
}

impl BuildPlan {
    /// Resolve options, propagate them, resolve toolchain variables and
    /// render the run environment.
    pub fn prepare(
        descriptor: PackageDescriptor,
        overrides: &BTreeMap<String, String>,
        metadata: &DependencyMetadata,
    ) -> RecipeResult<Self> {
        let options = resolve_options(&descriptor, overrides)?;
        let propagated = propagate_options(&descriptor, &options);
        let toolchain = toolchain_variables(&descriptor, &options, metadata)?;
        let environment = render_environment(&descriptor, &options);

        tracing::info!(
            package = %descriptor.name,
            version = %descriptor.version,
            dependencies = propagated.len(),
            "Prepared build plan"
        );

        Ok(Self {
            descriptor,
            options,
            propagated,
            toolchain,
            environment,
        })
    }

    pub fn lock(&self) -> LockFile {
        LockFile::new(&self.descriptor, &self.options, &self.propagated)
    }

    /// Write toolchain file, run-environment scripts and lock file.
    pub fn generate(&self, output_dir: &Path) -> RecipeResult<GeneratedFiles> {
        write_generated_files(self, output_dir)
    }

    /// Run the build through `driver` and save a build record in `output_dir`.
    pub fn execute(
        &self,
        driver: &mut dyn ToolchainDriver,
        build_type: &str,
        output_dir: &Path,
    ) -> Result<BuildRecord> {
        let steps: Vec<BuildStep> = invoke_build(driver)?;

        let record = BuildRecord::new(
            &self.descriptor.name,
            &self.descriptor.version,
            build_type,
            self.options.clone(),
            steps,
        );
        let path = record.save_to_dir(output_dir)?;
        tracing::info!(path = %path.display(), "Saved build record");
        Ok(record)
    }
}
