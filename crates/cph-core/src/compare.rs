//! Whitespace-insensitive output comparison.

use serde::{Deserialize, Serialize};

/// Outcome of judging one fixture case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    Passed,
    Failed { expected: String, actual: String },
    Error { message: String },
}

impl CaseOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, CaseOutcome::Passed)
    }

    /// Short status word used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            CaseOutcome::Passed => "Passed",
            CaseOutcome::Failed { .. } => "Failed",
            CaseOutcome::Error { .. } => "Error",
        }
    }

    /// Human-readable reason, absent for passing cases.
    pub fn reason(&self) -> Option<String> {
        match self {
            CaseOutcome::Passed => None,
            CaseOutcome::Failed { expected, actual } => {
                Some(format!("Expected \"{expected}\", but got \"{actual}\""))
            }
            CaseOutcome::Error { message } => Some(message.clone()),
        }
    }
}

/// Remove every whitespace character, newlines included.
pub fn normalize(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Compare actual and expected output after whitespace normalization.
pub fn compare(actual: &str, expected: &str) -> CaseOutcome {
    if normalize(actual) == normalize(expected) {
        CaseOutcome::Passed
    } else {
        CaseOutcome::Failed {
            expected: expected.trim().to_string(),
            actual: actual.trim().to_string(),
        }
    }
}

/// Judge an execution result. Errors propagate unchanged and skip comparison.
pub fn judge<E: std::fmt::Display>(actual: Result<String, E>, expected: &str) -> CaseOutcome {
    match actual {
        Ok(output) => compare(&output, expected),
        Err(e) => CaseOutcome::Error {
            message: e.to_string(),
        },
    }
}
