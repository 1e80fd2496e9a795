//! Compile-and-run of one solution against one fixture case.
//!
//! Per case the adapter walks a fixed sequence:
//! validate -> [compile] -> execute -> read output.
//! Compiled languages write a fixed artifact name next to the solution, so
//! compile+execute for one language id runs under a shared lock, and the
//! artifact is removed when the case finishes on every exit path.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::process::Command;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, warn};

use crate::error::{RunError, RunResult};
use crate::language::{expand, LanguageSpec, TemplateVars};

/// Default wall-clock budget for one run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default wall-clock budget for one compile.
pub const DEFAULT_COMPILE_TIMEOUT: Duration = Duration::from_secs(60);

/// Captured result of one child process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code (-1 when killed by a signal).
    pub exit_code: i32,

    /// Captured stdout (empty when redirected to a file).
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,

    pub success: bool,
}

impl ProcessOutput {
    /// Clean exit with nothing on stderr.
    pub fn is_clean(&self) -> bool {
        self.success && self.stderr.trim().is_empty()
    }
}

/// Per-language mutual exclusion around compile+run.
#[derive(Debug, Clone, Default)]
pub struct LanguageLocks {
    inner: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl LanguageLocks {
    pub async fn acquire(&self, id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(map.entry(id.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}

/// Removes a compiled artifact when dropped.
struct ArtifactGuard {
    path: PathBuf,
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed compiled artifact"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to clean up file"),
        }
    }
}

/// Compiles and runs solutions against fixture files.
#[derive(Debug, Clone)]
pub struct SolutionRunner {
    timeout: Duration,
    compile_timeout: Duration,
    locks: LanguageLocks,
}

impl Default for SolutionRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl SolutionRunner {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            compile_timeout: DEFAULT_COMPILE_TIMEOUT,
            locks: LanguageLocks::default(),
        }
    }

    pub fn with_compile_timeout(mut self, timeout: Duration) -> Self {
        self.compile_timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Validate the language/solution pairing. Returns the absolute solution path.
    pub fn check_solution(&self, spec: &LanguageSpec, solution: &Path) -> RunResult<PathBuf> {
        spec.check_extension(solution)?;
        if !solution.is_file() {
            return Err(RunError::SolutionNotFound(solution.to_path_buf()));
        }
        Ok(std::fs::canonicalize(solution)?)
    }

    /// Run `solution` with `input` on stdin and stdout redirected to `output`.
    ///
    /// Returns the trimmed contents of `output`. A non-zero exit, anything
    /// on stderr, or a timeout is an error and the partial output is not
    /// returned.
    pub async fn run(
        &self,
        spec: &LanguageSpec,
        input: &Path,
        output: &Path,
        solution: &Path,
    ) -> RunResult<String> {
        let source = self.check_solution(spec, solution)?;
        if !input.is_file() {
            return Err(RunError::InputNotFound(input.to_path_buf()));
        }
        let output_dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        if !output_dir.is_dir() {
            return Err(RunError::OutputDirMissing(output_dir.to_path_buf()));
        }

        let vars = template_vars(&source, spec);

        // Declaration order matters: the artifact guard drops before the lock
        // is released, so the next case never sees a stale binary.
        let _lock = if spec.is_compiled() {
            Some(self.locks.acquire(&spec.id).await)
        } else {
            None
        };
        let _artifact = spec.artifact.as_ref().map(|_| ArtifactGuard {
            path: PathBuf::from(&vars.artifact),
        });

        if let Some(compile) = &spec.compile {
            let command = expand(compile, &vars);
            debug!(language = %spec.id, command = ?command, "Compiling solution");
            let result = run_process(&command, None, None, self.compile_timeout)
                .await
                .map_err(|e| match e {
                    RunError::Timeout { .. } | RunError::Spawn { .. } => RunError::Compile {
                        language: spec.id.clone(),
                        message: e.to_string(),
                    },
                    other => other,
                })?;
            if !result.success {
                let message = if result.stderr.trim().is_empty() {
                    format!("compiler exited with code {}", result.exit_code)
                } else {
                    result.stderr.trim().to_string()
                };
                return Err(RunError::Compile {
                    language: spec.id.clone(),
                    message,
                });
            }
        }

        let command = expand(&spec.run, &vars);
        debug!(language = %spec.id, command = ?command, input = %input.display(), "Executing solution");
        let stdin = File::open(input)?;
        let stdout = File::create(output)?;
        let result = run_process(&command, Some(stdin), Some(stdout), self.timeout).await?;

        if !result.is_clean() {
            let message = if result.stderr.trim().is_empty() {
                format!("process exited with code {}", result.exit_code)
            } else {
                result.stderr.trim().to_string()
            };
            return Err(RunError::Runtime(message));
        }

        Ok(tokio::fs::read_to_string(output).await?.trim().to_string())
    }
}

fn template_vars(source: &Path, spec: &LanguageSpec) -> TemplateVars {
    let dir = source.parent().unwrap_or_else(|| Path::new("."));
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut vars = TemplateVars {
        source: source.to_string_lossy().to_string(),
        dir: dir.to_string_lossy().to_string(),
        stem,
        artifact: String::new(),
    };
    if let Some(artifact) = &spec.artifact {
        vars.artifact = dir.join(vars.apply(artifact)).to_string_lossy().to_string();
    }
    vars
}

/// Spawn `command`, wiring stdin/stdout to files when given, and wait with
/// a timeout. The child is killed if the timeout fires.
pub async fn run_process(
    command: &[String],
    stdin: Option<File>,
    stdout: Option<File>,
    timeout: Duration,
) -> RunResult<ProcessOutput> {
    let start = Instant::now();

    let Some((exe, args)) = command.split_first() else {
        return Err(RunError::Runtime("empty command".to_string()));
    };

    let mut cmd = Command::new(exe);
    cmd.args(args)
        .stdin(stdin.map(Stdio::from).unwrap_or_else(Stdio::null))
        .stdout(stdout.map(Stdio::from).unwrap_or_else(Stdio::piped))
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|source| RunError::Spawn {
        program: exe.clone(),
        source,
    })?;

    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| RunError::Timeout {
            limit_ms: timeout.as_millis() as u64,
        })??;

    Ok(ProcessOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration_ms: start.elapsed().as_millis() as u64,
        success: output.status.success(),
    })
}
