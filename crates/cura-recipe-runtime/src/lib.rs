//! Infrastructure for the Cura recipe: the CMake toolchain driver, file
//! generators, launcher templates, build records and the end-to-end pipeline.
#![deny(unused_crate_dependencies)]

pub mod cmake;
pub mod generate;
pub mod launcher;
pub mod lock;
pub mod pipeline;
pub mod record;

pub use cmake::{CMakeConfig, CMakeDriver, build_parallelism};
pub use generate::{GeneratedFiles, LOCK_FILE, RUN_ENV_BAT, RUN_ENV_SH, TOOLCHAIN_FILE};
pub use launcher::{LauncherTarget, TargetParseError, render_launchers};
pub use lock::{LockFile, LockedDependency};
pub use pipeline::BuildPlan;
pub use record::{BUILD_RECORD_FILE, BuildRecord};
