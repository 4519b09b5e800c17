//! Commands enum and shared argument groups.

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Option overrides shared by every resolving command.
#[derive(Args, Debug, Clone, Default)]
pub struct OptionArgs {
    /// Override an option (repeatable), e.g. `-o staging=true`
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,
}

/// Dependency metadata published by the external resolver.
#[derive(Args, Debug, Clone, Default)]
pub struct MetadataArgs {
    /// JSON file of the form {"Dep": {"KEY": "value"}}
    #[arg(long, value_name = "FILE")]
    pub metadata: Option<PathBuf>,

    /// Single metadata value (repeatable), e.g. `Uranium.URANIUM_CMAKE_PATH=/opt/uranium/cmake`
    #[arg(long = "dep-info", value_name = "DEP.KEY=VALUE")]
    pub dep_info: Vec<String>,
}

/// Output format for the `env` command.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnvFormat {
    /// `export KEY="value"` lines
    #[default]
    Shell,
    /// `set "KEY=value"` lines
    Batch,
    /// JSON object
    Json,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show package identity, options and dependencies
    Inspect,

    /// Show resolved option values
    Options {
        #[command(flatten)]
        overrides: OptionArgs,
    },

    /// Show options forwarded to each dependency
    Propagate {
        #[command(flatten)]
        overrides: OptionArgs,
    },

    /// Print the run environment
    Env {
        #[command(flatten)]
        overrides: OptionArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = EnvFormat::Shell)]
        format: EnvFormat,
    },

    /// Write toolchain file, run-environment scripts and lock file
    Generate {
        #[command(flatten)]
        overrides: OptionArgs,
        #[command(flatten)]
        metadata: MetadataArgs,
        /// Directory for generated files
        #[arg(long, env = "CURA_RECIPE_OUTPUT_DIR", default_value = "build/generators")]
        output_dir: PathBuf,
    },

    /// Render launcher files from a template, one per target
    Launchers {
        #[command(flatten)]
        overrides: OptionArgs,
        /// Template file
        #[arg(long)]
        template: PathBuf,
        /// Target as name:entry_point[:arguments] (repeatable)
        #[arg(long = "target", required = true)]
        targets: Vec<String>,
        /// Directory for rendered files
        #[arg(long, default_value = ".run")]
        output_dir: PathBuf,
    },

    /// Generate files, then configure, build and install with CMake
    Build {
        #[command(flatten)]
        overrides: OptionArgs,
        #[command(flatten)]
        metadata: MetadataArgs,
        /// Source directory holding CMakeLists.txt
        #[arg(long, default_value = ".")]
        source_dir: PathBuf,
        /// CMake build tree
        #[arg(long, default_value = "build")]
        build_dir: PathBuf,
        /// Directory for generated files and the build record
        #[arg(long, env = "CURA_RECIPE_OUTPUT_DIR", default_value = "build/generators")]
        output_dir: PathBuf,
        /// CMake build type
        #[arg(long, default_value = "Release")]
        build_type: String,
        /// Install prefix passed to CMake
        #[arg(long)]
        install_prefix: Option<PathBuf>,
        /// Parallel build jobs (defaults to CMAKE_BUILD_PARALLEL_LEVEL or CPU count)
        #[arg(short, long)]
        jobs: Option<usize>,
        /// Resolve and generate files only; do not run CMake
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the last recorded build
    Status {
        /// Directory holding the build record
        #[arg(long, env = "CURA_RECIPE_OUTPUT_DIR", default_value = "build/generators")]
        output_dir: PathBuf,
    },
}
