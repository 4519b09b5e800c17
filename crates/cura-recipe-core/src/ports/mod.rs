//! Port definitions for external systems.
//!
//! The core only knows the toolchain driver through this trait. The CMake
//! implementation lives in `cura-recipe-runtime`.

pub mod toolchain_driver;

pub use toolchain_driver::{ToolError, ToolchainDriver};

#[cfg(test)]
pub use toolchain_driver::MockToolchainDriver;
