//! CPH Runner - judge local solutions against CPH fixtures
//!
//! Provides:
//! - Language recipes for compiling and running solutions
//! - A per-case execution adapter with timeouts and artifact cleanup
//! - A suite orchestrator that produces an index-ordered report

pub mod error;
pub mod language;
pub mod report;
pub mod runner;
pub mod suite;

// Re-export key types
pub use error::{RunError, RunResult};
pub use language::{Language, LanguageSpec};
pub use report::{CaseReport, SuiteReport};
pub use runner::{SolutionRunner, DEFAULT_TIMEOUT};
pub use suite::TestSuite;
