//! CLI-specific error types and exit-code mapping.

use cura_recipe_core::RecipeError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Recipe resolution error.
    #[error("{0}")]
    Recipe(String),

    /// Argument or override error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Descriptor or metadata error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// External build tool failed.
    #[error("Build error: {0}")]
    Build(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where a category fits.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Recipe(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Build(_) => 71,    // EX_OSERR
        }
    }

    /// Classify an error surfaced by a handler.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        if let Some(recipe) = err.downcast_ref::<RecipeError>() {
            return Self::from_recipe(recipe, err);
        }
        if err.downcast_ref::<std::io::Error>().is_some() {
            return Self::Io(format!("{err:#}"));
        }
        Self::Recipe(format!("{err:#}"))
    }

    fn from_recipe(recipe: &RecipeError, err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");
        match recipe {
            RecipeError::UnknownOption { .. }
            | RecipeError::InvalidOptionValue { .. }
            | RecipeError::InvalidOverride(_) => Self::Arguments(message),
            RecipeError::InvalidDescriptor(_)
            | RecipeError::InvalidReference(_)
            | RecipeError::MissingOptionValue { .. }
            | RecipeError::MissingDependencyMetadata { .. }
            | RecipeError::TemplateNotFound { .. }
            | RecipeError::InvalidTemplate { .. }
            | RecipeError::Json(_) => Self::Config(message),
            RecipeError::Build { .. } => Self::Build(message),
            RecipeError::Io(_) => Self::Io(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_option_is_usage_error() {
        let err = anyhow::Error::new(RecipeError::UnknownOption {
            name: "shared".to_string(),
        });
        assert_eq!(CliError::from_anyhow(&err).exit_code(), 2);
    }

    #[test]
    fn test_missing_metadata_is_config_error() {
        let err = anyhow::Error::new(RecipeError::MissingDependencyMetadata {
            dependency: "Uranium".to_string(),
            key: "URANIUM_CMAKE_PATH".to_string(),
        });
        assert_eq!(CliError::from_anyhow(&err).exit_code(), 78);
    }

    #[test]
    fn test_context_is_kept_in_message() {
        let err = anyhow::Error::new(RecipeError::InvalidOverride("x".to_string()))
            .context("Failed to parse overrides");
        let cli = CliError::from_anyhow(&err);
        assert_eq!(cli.exit_code(), 2);
        assert!(cli.to_string().contains("Failed to parse overrides"));
    }

    #[test]
    fn test_plain_errors_are_general_failures() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(CliError::from_anyhow(&err).exit_code(), 1);
    }
}
