//! Main CLI parser and top-level argument handling.

use clap::Parser;
use std::path::PathBuf;

use crate::commands::Commands;

/// Resolve, generate and build the Cura package recipe.
#[derive(Parser)]
#[command(name = "cura-recipe")]
#[command(about = "Resolve options, generate toolchain files and build the Cura package")]
#[command(version)]
pub struct Cli {
    /// Package descriptor (JSON). The built-in Cura descriptor is used when omitted
    #[arg(long, global = true, env = "CURA_RECIPE_DESCRIPTOR")]
    pub descriptor: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
