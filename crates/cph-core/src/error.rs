//! Error taxonomy for example acquisition and the fixture store.

use std::path::PathBuf;

/// Errors produced while acquiring examples or reading/writing fixtures.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("mismatch between number of inputs ({inputs}) and expected outputs ({outputs})")]
    CountMismatch { inputs: usize, outputs: usize },

    #[error("no test cases found; verify the page structure or problem name")]
    NoExamples,

    #[error("problem not found: {0}")]
    ProblemNotFound(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("test case {index} has an empty {side}")]
    EmptySide { index: usize, side: &'static str },

    #[error(
        "fixture directory {root} holds {inputs} input file(s) but {expected} expected output file(s)"
    )]
    CaseCountMismatch {
        root: PathBuf,
        inputs: usize,
        expected: usize,
    },

    #[error("testcases directory not found: {0}; fetch test cases first")]
    MissingRoot(PathBuf),

    #[error("no test cases found in {0}; fetch test cases first")]
    NoCases(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl FixtureError {
    /// Whether the error belongs to the acquisition stage (nothing gets written).
    pub fn is_acquisition(&self) -> bool {
        matches!(
            self,
            FixtureError::CountMismatch { .. }
                | FixtureError::NoExamples
                | FixtureError::ProblemNotFound(_)
                | FixtureError::Http(_)
        )
    }
}

impl From<reqwest::Error> for FixtureError {
    fn from(err: reqwest::Error) -> Self {
        FixtureError::Http(err.to_string())
    }
}

/// Result type for fixture operations.
pub type Result<T> = std::result::Result<T, FixtureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_mismatch_display() {
        let err = FixtureError::CountMismatch {
            inputs: 3,
            outputs: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("mismatch"));
        assert!(msg.contains('3'));
        assert!(msg.contains('2'));
        assert!(err.is_acquisition());
    }

    #[test]
    fn test_store_errors_are_not_acquisition() {
        let err = FixtureError::NoCases(PathBuf::from("testcases"));
        assert!(!err.is_acquisition());
        assert!(err.to_string().contains("testcases"));
    }
}
