//! Command-line adapter for the Cura recipe.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary target only
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{Commands, EnvFormat, MetadataArgs, OptionArgs};
pub use error::CliError;
pub use parser::Cli;
