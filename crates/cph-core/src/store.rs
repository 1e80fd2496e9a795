//! Filesystem-backed fixture store.
//!
//! Layout: `<root>/testcase_<n>/{input.txt, expected_output.txt, output.txt}`
//! with `n` 1-based and contiguous. `output.txt` is written by the runner.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{FixtureError, Result};
use crate::format::format_values;
use crate::parse_example;
use crate::value::ArgumentSequence;

/// Directory name prefix of every fixture case.
pub const CASE_PREFIX: &str = "testcase_";
/// Serialized argument sequence.
pub const INPUT_FILE: &str = "input.txt";
/// Serialized expected result.
pub const EXPECTED_FILE: &str = "expected_output.txt";
/// Captured solution stdout.
pub const OUTPUT_FILE: &str = "output.txt";

/// One example, already split and coerced on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleCase {
    pub input: ArgumentSequence,
    pub output: ArgumentSequence,
}

impl ExampleCase {
    /// Run both raw sides through the split/coerce pipeline.
    pub fn from_raw(input: &str, output: &str) -> Self {
        Self {
            input: parse_example(input),
            output: parse_example(output),
        }
    }

    /// Whether either side produced no arguments.
    pub fn is_incomplete(&self) -> bool {
        self.input.is_empty() || self.output.is_empty()
    }
}

/// Counts reported after materialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializeSummary {
    pub saved: usize,
    pub skipped: usize,
}

/// A materialized fixture case on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureCase {
    /// 1-based case index.
    pub index: usize,
    pub dir: PathBuf,
}

impl FixtureCase {
    pub fn input_path(&self) -> PathBuf {
        self.dir.join(INPUT_FILE)
    }

    pub fn expected_path(&self) -> PathBuf {
        self.dir.join(EXPECTED_FILE)
    }

    pub fn output_path(&self) -> PathBuf {
        self.dir.join(OUTPUT_FILE)
    }

    /// Read the expected output, trimmed.
    pub fn read_expected(&self) -> Result<String> {
        Ok(fs::read_to_string(self.expected_path())?.trim().to_string())
    }
}

/// Fixture store rooted at a testcases directory.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    root: PathBuf,
    skip_incomplete: bool,
}

impl FixtureStore {
    /// Create a store rooted at `root`. Nothing is touched on disk yet.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            skip_incomplete: true,
        }
    }

    /// When `false`, an example with an empty side fails materialization
    /// instead of being skipped.
    pub fn with_skip_incomplete(mut self, skip: bool) -> Self {
        self.skip_incomplete = skip;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of case `index`.
    pub fn case_dir(&self, index: usize) -> PathBuf {
        self.root.join(format!("{CASE_PREFIX}{index}"))
    }

    /// Remove the whole root directory. Missing roots are fine.
    pub fn reset(&self) -> Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
            info!(root = %self.root.display(), "Old test cases directory removed");
        }
        Ok(())
    }

    /// Write every complete example as a numbered fixture case, starting
    /// at `testcase_1`.
    ///
    /// Incomplete examples are skipped without consuming an index, so case
    /// numbers stay contiguous. A write failure is logged and counted as
    /// skipped; files already written for that case are left in place.
    pub fn materialize(&self, cases: &[ExampleCase]) -> Result<MaterializeSummary> {
        self.materialize_from(cases, 1)
    }

    /// Like [`materialize`](Self::materialize), but numbering starts at
    /// `first_index`. Existing cases below it are left alone.
    pub fn materialize_from(
        &self,
        cases: &[ExampleCase],
        first_index: usize,
    ) -> Result<MaterializeSummary> {
        let first_index = first_index.max(1);
        if !self.skip_incomplete {
            if let Some(pos) = cases.iter().position(ExampleCase::is_incomplete) {
                let side = if cases[pos].input.is_empty() {
                    "input"
                } else {
                    "expected output"
                };
                return Err(FixtureError::EmptySide {
                    index: first_index + pos,
                    side,
                });
            }
        }

        fs::create_dir_all(&self.root)?;

        let mut summary = MaterializeSummary::default();
        let mut index = first_index - 1;
        for (pos, case) in cases.iter().enumerate() {
            if case.is_incomplete() {
                warn!(example = pos + 1, "Skipping example: missing input/output");
                summary.skipped += 1;
                continue;
            }

            index += 1;
            match self.write_case(index, &format_values(&case.input), &format_values(&case.output)) {
                Ok(_) => {
                    debug!(case = index, "Test case saved");
                    summary.saved += 1;
                }
                Err(e) => {
                    warn!(case = index, error = %e, "Error saving test case");
                    summary.skipped += 1;
                }
            }
        }

        info!(
            saved = summary.saved,
            skipped = summary.skipped,
            root = %self.root.display(),
            "Materialized test cases"
        );
        Ok(summary)
    }

    /// Normalize a user-supplied example and append it after the existing cases.
    pub fn append_custom(&self, raw_input: &str, raw_output: &str) -> Result<FixtureCase> {
        let example = ExampleCase::from_raw(raw_input, raw_output);
        if example.input.is_empty() {
            return Err(FixtureError::EmptySide {
                index: self.next_index()?,
                side: "input",
            });
        }
        if example.output.is_empty() {
            return Err(FixtureError::EmptySide {
                index: self.next_index()?,
                side: "expected output",
            });
        }

        fs::create_dir_all(&self.root)?;
        let index = self.next_index()?;
        let case = self.write_case(
            index,
            &format_values(&example.input),
            &format_values(&example.output),
        )?;
        info!(case = index, "Custom test case added");
        Ok(case)
    }

    /// Enumerate materialized cases sorted by index.
    ///
    /// Fails when the number of input fixtures differs from the number of
    /// expected-output fixtures.
    pub fn cases(&self) -> Result<Vec<FixtureCase>> {
        if !self.root.is_dir() {
            return Err(FixtureError::MissingRoot(self.root.clone()));
        }

        let mut cases = Vec::new();
        let mut inputs = 0;
        let mut expected = 0;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let Some(index) = parse_case_index(&entry.file_name().to_string_lossy()) else {
                continue;
            };
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let case = FixtureCase {
                index,
                dir: entry.path(),
            };
            let has_input = case.input_path().is_file();
            let has_expected = case.expected_path().is_file();
            inputs += usize::from(has_input);
            expected += usize::from(has_expected);
            if has_input || has_expected {
                cases.push(case);
            }
        }

        if inputs != expected || inputs != cases.len() {
            return Err(FixtureError::CaseCountMismatch {
                root: self.root.clone(),
                inputs,
                expected,
            });
        }
        if cases.is_empty() {
            return Err(FixtureError::NoCases(self.root.clone()));
        }

        cases.sort_by_key(|c| c.index);
        Ok(cases)
    }

    /// Index the next appended case will get.
    pub fn next_index(&self) -> Result<usize> {
        Ok(self.case_count()? + 1)
    }

    /// Number of `testcase_<n>` directories under the root.
    fn case_count(&self) -> Result<usize> {
        if !self.root.is_dir() {
            return Ok(0);
        }
        let mut count = 0;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if parse_case_index(&entry.file_name().to_string_lossy()).is_some()
                && entry.file_type()?.is_dir()
            {
                count += 1;
            }
        }
        Ok(count)
    }

    fn write_case(&self, index: usize, input: &str, expected: &str) -> Result<FixtureCase> {
        let case = FixtureCase {
            index,
            dir: self.case_dir(index),
        };
        fs::create_dir_all(&case.dir)?;
        write_file(&case.input_path(), input)?;
        write_file(&case.expected_path(), expected)?;
        Ok(case)
    }
}

/// Write through a temp file in the same directory, then rename.
fn write_file(path: &Path, contents: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn parse_case_index(name: &str) -> Option<usize> {
    name.strip_prefix(CASE_PREFIX)?
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
}
