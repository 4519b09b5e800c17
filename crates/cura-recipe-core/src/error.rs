//! Error types for recipe resolution and build orchestration.
//!
//! Every variant aborts the pipeline at the point of failure. Nothing is
//! recovered locally and files already written are left in place.

use std::path::PathBuf;
use thiserror::Error;

use crate::build::BuildStep;
use crate::ports::ToolError;

/// Errors that can occur while resolving or building a recipe.
#[derive(Debug, Error)]
pub enum RecipeError {
    // === Options ===
    /// Override names an option the descriptor does not declare
    #[error("Unknown option '{name}'")]
    UnknownOption { name: String },

    /// Value lies outside the option's declared domain
    #[error("Invalid value '{value}' for option '{name}' (expected {expected})")]
    InvalidOptionValue {
        name: String,
        value: String,
        expected: String,
    },

    /// Override string is not of the form `key=value`
    #[error("Invalid option override '{0}' (expected key=value)")]
    InvalidOverride(String),

    /// A toolchain variable reads an option that resolved to no value
    #[error("Option '{name}' has no value (no default and no override)")]
    MissingOptionValue { name: String },

    // === Dependencies ===
    /// Dependency metadata lookup failed
    #[error("Dependency '{dependency}' does not expose metadata '{key}'")]
    MissingDependencyMetadata { dependency: String, key: String },

    /// Reference string is not `name/version@user/channel`
    #[error("Invalid dependency reference '{0}'")]
    InvalidReference(String),

    /// Descriptor violates one of its structural invariants
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    // === Templates ===
    /// Launcher template file does not exist
    #[error("Template not found: {}", .path.display())]
    TemplateNotFound { path: PathBuf },

    /// Template references a placeholder that cannot be filled
    #[error("Invalid template {}: {reason}", .path.display())]
    InvalidTemplate { path: PathBuf, reason: String },

    // === Build ===
    /// External toolchain step failed
    #[error("{step} step failed: {source}")]
    Build {
        step: BuildStep,
        #[source]
        source: ToolError,
    },

    // === IO & serialization ===
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RecipeError {
    /// Create an `InvalidDescriptor` error from any displayable reason
    pub fn invalid_descriptor(reason: impl std::fmt::Display) -> Self {
        Self::InvalidDescriptor(reason.to_string())
    }
}

/// Result type alias for recipe operations
pub type RecipeResult<T> = Result<T, RecipeError>;
