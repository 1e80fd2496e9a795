//! Error types for compiling and running solutions.

use std::path::PathBuf;

/// Errors produced by the execution adapter.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("incorrect solution file extension: expected {expected}, got {actual}")]
    ExtensionMismatch { expected: String, actual: String },

    #[error("solution file not found: {0}")]
    SolutionNotFound(PathBuf),

    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("output directory does not exist: {0}")]
    OutputDirMissing(PathBuf),

    #[error("{language} compilation failed: {message}")]
    Compile { language: String, message: String },

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("execution timed out after {limit_ms}ms")]
    Timeout { limit_ms: u64 },

    #[error("{0}")]
    Runtime(String),

    #[error("fixture error: {0}")]
    Fixture(#[from] cph_core::FixtureError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RunError {
    /// Configuration errors are detected before any process is spawned and
    /// abort the whole batch.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RunError::UnsupportedLanguage(_)
                | RunError::ExtensionMismatch { .. }
                | RunError::SolutionNotFound(_)
                | RunError::InputNotFound(_)
                | RunError::OutputDirMissing(_)
        )
    }
}

/// Result type for runner operations.
pub type RunResult<T> = std::result::Result<T, RunError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_mismatch_display() {
        let err = RunError::ExtensionMismatch {
            expected: ".py".to_string(),
            actual: ".cpp".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains(".py"));
        assert!(msg.contains(".cpp"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_runtime_errors_are_case_local() {
        assert!(!RunError::Timeout { limit_ms: 10_000 }.is_configuration());
        assert!(!RunError::Runtime("boom".into()).is_configuration());
        let err = RunError::Compile {
            language: "cpp".into(),
            message: "expected ';'".into(),
        };
        assert!(err.to_string().contains("cpp compilation failed"));
        assert!(!err.is_configuration());
    }
}
