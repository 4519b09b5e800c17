//! Build step sequencing over a [`ToolchainDriver`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{RecipeError, RecipeResult};
use crate::ports::ToolchainDriver;

/// One step of the external build, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStep {
    Configure,
    Build,
    Install,
}

impl BuildStep {
    pub const ALL: [Self; 3] = [Self::Configure, Self::Build, Self::Install];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Install => "install",
        }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run configure, build and install in that order.
///
/// The first failing step aborts the sequence; later steps are never invoked.
/// Returns the steps that completed.
pub fn invoke_build(driver: &mut dyn ToolchainDriver) -> RecipeResult<Vec<BuildStep>> {
    let mut completed = Vec::with_capacity(BuildStep::ALL.len());

    for step in BuildStep::ALL {
        tracing::info!(%step, "Running build step");
        let outcome = match step {
            BuildStep::Configure => driver.configure(),
            BuildStep::Build => driver.build(),
            BuildStep::Install => driver.install(),
        };

        if let Err(source) = outcome {
            tracing::error!(%step, error = %source, "Build step failed");
            return Err(RecipeError::Build { step, source });
        }
        completed.push(step);
    }

    Ok(completed)
}
