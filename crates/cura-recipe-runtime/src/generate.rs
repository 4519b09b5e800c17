//! Generated build inputs: toolchain file, run-environment scripts, lock file.

use cura_recipe_core::{RecipeResult, render_toolchain_file};
use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::BuildPlan;

pub const TOOLCHAIN_FILE: &str = "cura_toolchain.cmake";
pub const RUN_ENV_SH: &str = "run_env.sh";
pub const RUN_ENV_BAT: &str = "run_env.bat";
pub const LOCK_FILE: &str = "recipe.lock.json";

/// Paths of every file written by [`write_generated_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub toolchain_file: PathBuf,
    pub run_env_sh: PathBuf,
    pub run_env_bat: PathBuf,
    pub lock_file: PathBuf,
}

impl GeneratedFiles {
    pub fn paths(&self) -> [&Path; 4] {
        [
            self.toolchain_file.as_path(),
            self.run_env_sh.as_path(),
            self.run_env_bat.as_path(),
            self.lock_file.as_path(),
        ]
    }
}

/// Write every generated file into `output_dir`, creating it if needed.
pub fn write_generated_files(plan: &BuildPlan, output_dir: &Path) -> RecipeResult<GeneratedFiles> {
    fs::create_dir_all(output_dir)?;

    let files = GeneratedFiles {
        toolchain_file: output_dir.join(TOOLCHAIN_FILE),
        run_env_sh: output_dir.join(RUN_ENV_SH),
        run_env_bat: output_dir.join(RUN_ENV_BAT),
        lock_file: output_dir.join(LOCK_FILE),
    };

    fs::write(
        &files.toolchain_file,
        render_toolchain_file(&plan.descriptor.name, &plan.toolchain),
    )?;
    fs::write(&files.run_env_sh, plan.environment.to_shell_script())?;
    mark_executable(&files.run_env_sh)?;
    fs::write(&files.run_env_bat, plan.environment.to_batch_script())?;
    fs::write(
        &files.lock_file,
        serde_json::to_string_pretty(&plan.lock())?,
    )?;

    for path in files.paths() {
        tracing::debug!(path = %path.display(), "Generated file");
    }
    Ok(files)
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn mark_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
