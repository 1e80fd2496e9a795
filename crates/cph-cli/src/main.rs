//! CPH - Competitive Programming Helper CLI
//!
//! The `cph` command turns problem examples into local fixtures and judges
//! solutions against them.
//!
//! ## Commands
//!
//! - `fetch`: Download a problem's examples and write them as test cases
//! - `add`: Append a custom test case
//! - `run`: Run a solution against every test case
//! - `format`: Preview how raw example text is written to a fixture
//! - `cases`: List materialized test cases

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use cph_core::{
    render_example, CphConfig, ExampleSource, FixtureStore, HtmlFileSource, LeetCodeSource,
};
use cph_runner::{LanguageSpec, SolutionRunner, TestSuite};

#[derive(Parser)]
#[command(name = "cph")]
#[command(author = "CPH Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Competitive Programming Helper", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a problem's examples and write them as test cases
    Fetch {
        /// Problem slug or URL (e.g. two-sum)
        problem: String,

        /// Read the problem page from a saved HTML file instead of the network
        #[arg(long)]
        from_file: Option<PathBuf>,

        /// Test cases directory (default: from config)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Keep existing test cases and append the new ones after them
        #[arg(long)]
        keep: bool,
    },

    /// Append a custom test case; missing values are prompted for
    Add {
        /// Raw input text (e.g. "nums = [2,7,11,15], target = 9")
        #[arg(short, long)]
        input: Option<String>,

        /// Raw expected output text (e.g. "[0,1]")
        #[arg(short, long)]
        output: Option<String>,

        /// Test cases directory (default: from config)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Run a solution against every test case
    Run {
        /// Path to the solution file
        solution: PathBuf,

        /// Language: cpp, java, python or javascript
        #[arg(short, long)]
        lang: String,

        /// Test cases directory (default: from config)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Per-case timeout in seconds
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Maximum number of cases run at once
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        report_json: bool,
    },

    /// Show how raw example text is written to a fixture file
    Format {
        /// Raw example text
        raw: String,
    },

    /// List materialized test cases
    Cases {
        /// Test cases directory (default: from config)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    cph_core::init_tracing(cli.json, level);

    let config = CphConfig::load(Path::new(".")).context("Failed to load configuration")?;

    match cli.command {
        Commands::Fetch {
            problem,
            from_file,
            dir,
            keep,
        } => {
            let store = open_store(&config, dir);
            match from_file {
                Some(path) => cmd_fetch(&HtmlFileSource::new(path), &store, &problem, keep).await,
                None => {
                    let source = LeetCodeSource::new(&config.graphql_endpoint);
                    cmd_fetch(&source, &store, &problem, keep).await
                }
            }
        }
        Commands::Add { input, output, dir } => {
            let store = open_store(&config, dir);
            let input = match input {
                Some(v) => v,
                None => prompt("Enter test case input: ")?,
            };
            let output = match output {
                Some(v) => v,
                None => prompt("Enter expected output: ")?,
            };
            cmd_add(&store, &input, &output)
        }
        Commands::Run {
            solution,
            lang,
            dir,
            timeout,
            jobs,
            report_json,
        } => {
            let store = open_store(&config, dir);
            let config = CphConfig {
                timeout_secs: timeout.unwrap_or(config.timeout_secs),
                concurrency: jobs.unwrap_or(config.concurrency),
                ..config
            };
            anyhow::ensure!(
                config.timeout_secs > 0 && config.concurrency > 0,
                "--timeout and --jobs must be positive"
            );
            cmd_run(&config, &store, &solution, &lang, report_json).await
        }
        Commands::Format { raw } => cmd_format(&raw),
        Commands::Cases { dir } => cmd_cases(&open_store(&config, dir)),
    }
}

fn open_store(config: &CphConfig, dir: Option<PathBuf>) -> FixtureStore {
    FixtureStore::new(dir.unwrap_or_else(|| config.testcases_dir.clone()))
        .with_skip_incomplete(config.skip_incomplete)
}

/// Read one line from stdin after printing `message`.
fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

async fn cmd_fetch(
    source: &dyn ExampleSource,
    store: &FixtureStore,
    problem: &str,
    keep: bool,
) -> Result<()> {
    let examples = source
        .fetch(problem)
        .await
        .with_context(|| format!("Failed to fetch examples for '{problem}'"))?;
    let cases = examples
        .into_cases()
        .context("Problem examples are inconsistent")?;

    let first_index = if keep {
        store.next_index().context("Failed to read existing test cases")?
    } else {
        store.reset().context("Failed to clear old test cases")?;
        1
    };
    let summary = store
        .materialize_from(&cases, first_index)
        .context("Failed to write test cases")?;

    println!(
        "✓ Test cases saved to {} ({} saved, {} skipped)",
        store.root().display(),
        summary.saved,
        summary.skipped
    );
    Ok(())
}

fn cmd_add(store: &FixtureStore, input: &str, output: &str) -> Result<()> {
    let case = store
        .append_custom(input, output)
        .context("Failed to add custom test case")?;
    println!("✓ Custom test case {} added to {}", case.index, case.dir.display());
    Ok(())
}

async fn cmd_run(
    config: &CphConfig,
    store: &FixtureStore,
    solution: &Path,
    lang: &str,
    report_json: bool,
) -> Result<()> {
    let spec = LanguageSpec::resolve(lang, &config.python_command)?;
    let runner = SolutionRunner::new(config.timeout());

    info!(solution = %solution.display(), language = %spec.id, "Running solution");

    let report = TestSuite::run(store, &runner, &spec, solution, config.concurrency)
        .await
        .context("Failed to run test cases")?;

    if report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.render_text());
        if report.success() {
            println!("✓ All {} test cases passed", report.total());
        } else {
            println!(
                "✗ {} of {} test cases did not pass",
                report.total() - report.passed,
                report.total()
            );
        }
    }
    Ok(())
}

fn cmd_format(raw: &str) -> Result<()> {
    println!("{}", render_example(raw));
    Ok(())
}

fn cmd_cases(store: &FixtureStore) -> Result<()> {
    let cases = store.cases().context("Failed to list test cases")?;
    for case in &cases {
        println!("testcase_{}: {}", case.index, case.dir.display());
    }
    println!("{} test cases in {}", cases.len(), store.root().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<p><strong>Example 1:</strong></p>
<pre><strong>Input:</strong> nums = [2,7,11,15], target = 9
<strong>Output:</strong> [0,1]
<strong>Explanation:</strong> nums[0] + nums[1] == 9</pre>
<p><strong>Example 2:</strong></p>
<pre><strong>Input:</strong> nums = [3,2,4], target = 6
<strong>Output:</strong> [1,2]</pre>"#;

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from([
            "cph", "run", "main.py", "--lang", "python", "--jobs", "2", "--report-json",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                lang,
                jobs,
                report_json,
                ..
            } => {
                assert_eq!(lang, "python");
                assert_eq!(jobs, Some(2));
                assert!(report_json);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_cli_requires_lang_for_run() {
        assert!(Cli::try_parse_from(["cph", "run", "main.py"]).is_err());
    }

    #[tokio::test]
    async fn test_fetch_from_file_materializes_cases() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("two-sum.html");
        std::fs::write(&page, PAGE).unwrap();
        let store = FixtureStore::new(dir.path().join("testcases"));

        cmd_fetch(&HtmlFileSource::new(&page), &store, "two-sum", false)
            .await
            .unwrap();

        let cases = store.cases().unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(
            std::fs::read_to_string(cases[0].input_path()).unwrap(),
            "2 7 11 15\n9"
        );
        assert_eq!(cases[1].read_expected().unwrap(), "1 2");
    }

    #[tokio::test]
    async fn test_fetch_replaces_unless_keep() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("page.html");
        std::fs::write(&page, PAGE).unwrap();
        let store = FixtureStore::new(dir.path().join("testcases"));

        cmd_add(&store, "[5]", "5").unwrap();
        cmd_add(&store, "[6]", "6").unwrap();
        cmd_fetch(&HtmlFileSource::new(&page), &store, "two-sum", false)
            .await
            .unwrap();
        assert_eq!(store.cases().unwrap().len(), 2);
        assert_eq!(
            std::fs::read_to_string(store.case_dir(1).join("input.txt")).unwrap(),
            "2 7 11 15\n9"
        );
    }

    #[tokio::test]
    async fn test_fetch_keep_appends_after_custom_case() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("page.html");
        std::fs::write(&page, PAGE).unwrap();
        let store = FixtureStore::new(dir.path().join("testcases"));

        cmd_add(&store, "[42,43]", "99").unwrap();
        cmd_fetch(&HtmlFileSource::new(&page), &store, "two-sum", true)
            .await
            .unwrap();

        let cases = store.cases().unwrap();
        assert_eq!(cases.iter().map(|c| c.index).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(
            std::fs::read_to_string(cases[0].input_path()).unwrap(),
            "42 43"
        );
        assert_eq!(cases[0].read_expected().unwrap(), "99");
        assert_eq!(cases[2].read_expected().unwrap(), "1 2");
    }

    #[tokio::test]
    async fn test_fetch_page_without_examples_fails() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("empty.html");
        std::fs::write(&page, "<p>No examples here</p>").unwrap();
        let store = FixtureStore::new(dir.path().join("testcases"));

        let result = cmd_fetch(&HtmlFileSource::new(&page), &store, "x", false).await;
        assert!(result.is_err());
        assert!(!store.root().exists());
    }

    #[test]
    fn test_add_rejects_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let store = FixtureStore::new(dir.path().join("testcases"));
        assert!(cmd_add(&store, "", "1").is_err());
    }

    #[tokio::test]
    async fn test_run_with_unsupported_language() {
        let dir = tempfile::tempdir().unwrap();
        let store = FixtureStore::new(dir.path().join("testcases"));
        cmd_add(&store, "[1]", "1").unwrap();

        let result = cmd_run(
            &CphConfig::default(),
            &store,
            &dir.path().join("main.rb"),
            "ruby",
            false,
        )
        .await;
        assert!(result.unwrap_err().to_string().contains("unsupported language"));
    }

    #[test]
    fn test_cases_lists_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FixtureStore::new(dir.path().join("testcases"));
        assert!(cmd_cases(&store).is_err());
        cmd_add(&store, "[1,2]", "3").unwrap();
        cmd_cases(&store).unwrap();
    }
}
