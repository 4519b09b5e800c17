//! Toolchain driver trait definition.
//!
//! A driver configures, compiles and installs native artifacts. Each call is
//! a blocking foreign call with no cancellation.

use thiserror::Error;

/// Failure reported by the external tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool could not be started
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and exited unsuccessfully
    #[error("'{program}' exited with {}", exit_code_label(.code))]
    ExitStatus { program: String, code: Option<i32> },

    /// IO failure while talking to the tool
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_code_label(code: &Option<i32>) -> String {
    code.map_or_else(
        || "no exit code (terminated by signal)".to_string(),
        |c| format!("exit code {c}"),
    )
}

/// External build tool driven through configure, build and install.
#[cfg_attr(test, mockall::automock)]
pub trait ToolchainDriver {
    /// Generate the native build system.
    fn configure(&mut self) -> Result<(), ToolError>;

    /// Compile.
    fn build(&mut self) -> Result<(), ToolError>;

    /// Install artifacts into the configured prefix.
    fn install(&mut self) -> Result<(), ToolError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_message_includes_code() {
        let err = ToolError::ExitStatus {
            program: "cmake".to_string(),
            code: Some(2),
        };
        assert_eq!(err.to_string(), "'cmake' exited with exit code 2");
    }

    #[test]
    fn test_exit_status_message_without_code() {
        let err = ToolError::ExitStatus {
            program: "cmake".to_string(),
            code: None,
        };
        assert!(err.to_string().contains("terminated by signal"));
    }
}
