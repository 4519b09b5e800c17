//! Package descriptor and configuration resolution for the Cura recipe.
//!
//! The pipeline is strictly linear:
//!
//! ```text
//! declare -> resolve_options -> propagate_options -> (external resolver)
//!         -> toolchain_variables -> render_environment -> invoke_build
//! ```
//!
//! Everything here is pure except descriptor/metadata loading and the calls
//! made through the [`ToolchainDriver`] port.
#![deny(unused_crate_dependencies)]

pub mod build;
pub mod builtin;
pub mod descriptor;
pub mod environment;
pub mod error;
pub mod metadata;
pub mod options;
pub mod ports;
pub mod propagation;
pub mod toolchain;

pub use build::{BuildStep, invoke_build};
pub use builtin::cura_descriptor;
pub use descriptor::{
    BuildRequirement, DependencyRequirement, PackageDescriptor, ToolchainVariable, VariableSource,
};
pub use environment::{RunEnvironment, render_environment};
pub use error::{RecipeError, RecipeResult};
pub use metadata::DependencyMetadata;
pub use options::{OptionDomain, ResolvedOptions, parse_override, parse_overrides, resolve_options};
pub use ports::{ToolError, ToolchainDriver};
pub use propagation::{DependencyOptions, PropagatedOptions, propagate_options};
pub use toolchain::{ToolchainValue, render_toolchain_file, toolchain_variables};
