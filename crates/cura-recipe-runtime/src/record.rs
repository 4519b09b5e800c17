//! Build record storage.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use cura_recipe_core::{BuildStep, ResolvedOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the record inside the output directory.
pub const BUILD_RECORD_FILE: &str = "build-record.json";

/// Record of a completed build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub package: String,
    pub version: String,
    /// When the build finished
    pub build_date: DateTime<Utc>,
    /// `CMake` build type used
    pub build_type: String,
    pub options: ResolvedOptions,
    pub steps: Vec<BuildStep>,
}

impl BuildRecord {
    /// Create a record stamped with the current time
    pub fn new(
        package: &str,
        version: &str,
        build_type: &str,
        options: ResolvedOptions,
        steps: Vec<BuildStep>,
    ) -> Self {
        Self {
            package: package.to_string(),
            version: version.to_string(),
            build_date: Utc::now(),
            build_type: build_type.to_string(),
            options,
            steps,
        }
    }

    /// Save record to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize build record")?;
        fs::write(path, json).context("Failed to write build record")?;
        Ok(())
    }

    /// Save under [`BUILD_RECORD_FILE`] in `dir`, returning the path written
    pub fn save_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).context("Failed to create output directory")?;
        let path = dir.join(BUILD_RECORD_FILE);
        self.save(&path)?;
        Ok(path)
    }

    /// Load record from file
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read build record {}", path.display()))?;
        let record = serde_json::from_str(&json).context("Failed to parse build record")?;
        Ok(record)
    }
}
