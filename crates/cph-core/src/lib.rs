//! CPH Core - example text to on-disk fixtures
//!
//! Turns loosely structured example text scraped from a problem page into
//! a canonical, line-oriented fixture format:
//! - [`split`] breaks raw text into top-level argument tokens
//! - [`value`] coerces each token into a [`CanonicalValue`]
//! - [`format`] renders values as whitespace-tokenized lines
//! - [`store`] persists numbered `testcase_<n>` directories
//! - [`compare`] judges actual output against expected output

pub mod compare;
pub mod config;
pub mod error;
pub mod format;
pub mod source;
pub mod split;
pub mod store;
pub mod telemetry;
pub mod value;

pub use compare::{compare, judge, normalize, CaseOutcome};
pub use config::CphConfig;
pub use error::{FixtureError, Result};
pub use format::{format_values, value_lines};
pub use source::{extract_examples, ExampleSource, HtmlFileSource, LeetCodeSource, RawExamples};
pub use split::{repair_adjacent_groups, split};
pub use store::{ExampleCase, FixtureCase, FixtureStore, MaterializeSummary};
pub use telemetry::init_tracing;
pub use value::{coerce, coerce_all, ArgumentSequence, CanonicalValue};

/// Split and coerce one raw example.
pub fn parse_example(raw: &str) -> ArgumentSequence {
    coerce_all(split(raw))
}

/// Render one raw example exactly as it would be written to a fixture file.
pub fn render_example(raw: &str) -> String {
    format_values(&parse_example(raw))
}
