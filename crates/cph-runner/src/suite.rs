//! Run every fixture case against one solution and collect a report.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use cph_core::{judge, CaseOutcome, FixtureCase, FixtureStore};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::RunResult;
use crate::language::LanguageSpec;
use crate::report::{CaseReport, SuiteReport};
use crate::runner::SolutionRunner;

/// Suite orchestrator.
pub struct TestSuite;

impl TestSuite {
    /// Run all cases under `store` against `solution`.
    ///
    /// Configuration problems (language/extension mismatch, missing
    /// solution, missing or inconsistent fixtures) abort before any process
    /// is spawned. After that every case is attempted; per-case errors end
    /// up in the report. At most `concurrency` cases run at once and the
    /// report is ordered by case index regardless of completion order.
    pub async fn run(
        store: &FixtureStore,
        runner: &SolutionRunner,
        spec: &LanguageSpec,
        solution: &Path,
        concurrency: usize,
    ) -> RunResult<SuiteReport> {
        let started_at = Utc::now();
        let start = Instant::now();

        let solution = runner.check_solution(spec, solution)?;
        let cases = store.cases()?;

        info!(
            language = %spec.id,
            solution = %solution.display(),
            cases = cases.len(),
            "Running test cases"
        );

        let sem = Arc::new(Semaphore::new(concurrency.max(1)));
        let spec = Arc::new(spec.clone());
        let solution = Arc::new(solution);

        let mut join_set = JoinSet::new();
        for (slot, case) in cases.iter().cloned().enumerate() {
            let sem = Arc::clone(&sem);
            let runner = runner.clone();
            let spec = Arc::clone(&spec);
            let solution = Arc::clone(&solution);
            join_set.spawn(async move {
                let _permit = sem.acquire_owned().await.ok();
                (slot, run_case(&runner, &spec, &solution, &case).await)
            });
        }

        let mut slots: Vec<Option<CaseReport>> = vec![None; cases.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((slot, report)) => slots[slot] = Some(report),
                Err(e) => warn!(error = %e, "Test case task failed to join"),
            }
        }

        let reports = cases
            .iter()
            .zip(slots)
            .map(|(case, slot)| {
                slot.unwrap_or_else(|| CaseReport {
                    index: case.index,
                    outcome: CaseOutcome::Error {
                        message: "test case did not complete".to_string(),
                    },
                    duration_ms: 0,
                })
            })
            .collect();

        let report = SuiteReport::new(
            started_at,
            &spec.id,
            solution.as_ref().clone(),
            start.elapsed().as_millis() as u64,
            reports,
        );

        info!(
            passed = report.passed,
            failed = report.failed,
            errors = report.errors,
            duration_ms = report.duration_ms,
            "Test run finished"
        );
        Ok(report)
    }
}

async fn run_case(
    runner: &SolutionRunner,
    spec: &LanguageSpec,
    solution: &Path,
    case: &FixtureCase,
) -> CaseReport {
    let start = Instant::now();

    let outcome = match case.read_expected() {
        Ok(expected) => {
            let actual = runner
                .run(spec, &case.input_path(), &case.output_path(), solution)
                .await;
            judge(actual, &expected)
        }
        Err(e) => CaseOutcome::Error {
            message: e.to_string(),
        },
    };

    debug!(case = case.index, status = outcome.label(), "Test case finished");

    CaseReport {
        index: case.index,
        outcome,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}
