//! Aggregated results of one suite run.

use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use cph_core::CaseOutcome;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of one fixture case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    /// 1-based fixture index.
    pub index: usize,

    #[serde(flatten)]
    pub outcome: CaseOutcome,

    pub duration_ms: u64,
}

/// Result of running every fixture case against one solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub run_id: Uuid,

    pub started_at: DateTime<Utc>,

    /// Language identifier the solution ran under.
    pub language: String,

    pub solution: PathBuf,

    /// Wall-clock duration of the whole suite in milliseconds.
    pub duration_ms: u64,

    /// Per-case outcomes sorted by index.
    pub cases: Vec<CaseReport>,

    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
}

impl SuiteReport {
    /// Build a report, sorting cases by index and tallying outcomes.
    pub fn new(
        started_at: DateTime<Utc>,
        language: &str,
        solution: PathBuf,
        duration_ms: u64,
        mut cases: Vec<CaseReport>,
    ) -> Self {
        cases.sort_by_key(|c| c.index);
        let mut report = Self {
            run_id: Uuid::new_v4(),
            started_at,
            language: language.to_string(),
            solution,
            duration_ms,
            cases,
            passed: 0,
            failed: 0,
            errors: 0,
        };
        for case in &report.cases {
            match case.outcome {
                CaseOutcome::Passed => report.passed += 1,
                CaseOutcome::Failed { .. } => report.failed += 1,
                CaseOutcome::Error { .. } => report.errors += 1,
            }
        }
        report
    }

    pub fn total(&self) -> usize {
        self.cases.len()
    }

    /// Whether every case passed.
    pub fn success(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }

    /// `Summary: P Passed, F Failed, E Errors`
    pub fn summary_line(&self) -> String {
        format!(
            "Summary: {} Passed, {} Failed, {} Errors",
            self.passed, self.failed, self.errors
        )
    }

    /// Human-readable report: one line per case, then the summary line.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for case in &self.cases {
            let _ = write!(out, "Test {}: {}", case.index, case.outcome.label());
            if let Some(reason) = case.outcome.reason() {
                let _ = write!(out, " - {reason}");
            }
            out.push('\n');
        }
        out.push_str(&self.summary_line());
        out
    }
}
