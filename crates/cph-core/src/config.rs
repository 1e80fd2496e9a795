//! Layered configuration: defaults, then `cph.toml`, then `CPH_*` variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FixtureError, Result};

/// Name of the optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "cph.toml";

/// Default LeetCode GraphQL endpoint.
pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://leetcode.com/graphql";

/// CPH configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CphConfig {
    /// Root of the fixture store.
    pub testcases_dir: PathBuf,

    /// Wall-clock budget per solution run, in seconds.
    pub timeout_secs: u64,

    /// Maximum number of cases executed at once.
    pub concurrency: usize,

    /// Skip examples with an empty side instead of failing.
    pub skip_incomplete: bool,

    /// Interpreter used for the `python` language.
    pub python_command: String,

    /// GraphQL endpoint queried for problem content.
    pub graphql_endpoint: String,
}

impl Default for CphConfig {
    fn default() -> Self {
        Self {
            testcases_dir: PathBuf::from("testcases"),
            timeout_secs: 10,
            concurrency: 4,
            skip_incomplete: true,
            python_command: "python3".to_string(),
            graphql_endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
        }
    }
}

impl CphConfig {
    /// Load defaults, overlay `<dir>/cph.toml` if present, then the environment.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        let base = if path.is_file() {
            debug!(path = %path.display(), "Loading config file");
            Self::from_toml(&std::fs::read_to_string(&path)?)?
        } else {
            Self::default()
        };
        base.with_env(|key| std::env::var(key).ok())
    }

    /// Parse a TOML document; absent keys keep their defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FixtureError::Config(e.to_string()))
    }

    /// Apply `CPH_*` overrides read through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("CPH_TESTCASES_DIR") {
            self.testcases_dir = PathBuf::from(dir);
        }
        if let Some(secs) = lookup("CPH_TIMEOUT_SECS") {
            self.timeout_secs = parse_number("CPH_TIMEOUT_SECS", &secs)?;
        }
        if let Some(jobs) = lookup("CPH_CONCURRENCY") {
            self.concurrency = parse_number("CPH_CONCURRENCY", &jobs)?;
        }
        if let Some(strict) = lookup("CPH_STRICT_FIXTURES") {
            self.skip_incomplete = !matches!(strict.trim(), "1" | "true" | "yes");
        }
        if let Some(python) = lookup("CPH_PYTHON") {
            self.python_command = python;
        }
        if let Some(endpoint) = lookup("CPH_GRAPHQL_ENDPOINT") {
            self.graphql_endpoint = endpoint;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(FixtureError::Config("timeout_secs must be positive".into()));
        }
        if self.concurrency == 0 {
            return Err(FixtureError::Config("concurrency must be positive".into()));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| FixtureError::Config(format!("{key} must be a number, got {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = CphConfig::default();
        assert_eq!(cfg.testcases_dir, PathBuf::from("testcases"));
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert!(cfg.skip_incomplete);
        assert_eq!(cfg.graphql_endpoint, DEFAULT_GRAPHQL_ENDPOINT);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = CphConfig::from_toml("timeout_secs = 3\npython_command = \"pypy3\"\n").unwrap();
        assert_eq!(cfg.timeout_secs, 3);
        assert_eq!(cfg.python_command, "pypy3");
        assert_eq!(cfg.concurrency, 4);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = CphConfig::from_toml("timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, FixtureError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let cfg = CphConfig::default()
            .with_env(env(&[
                ("CPH_TESTCASES_DIR", "/tmp/cases"),
                ("CPH_TIMEOUT_SECS", "2"),
                ("CPH_CONCURRENCY", "1"),
                ("CPH_STRICT_FIXTURES", "1"),
            ]))
            .unwrap();
        assert_eq!(cfg.testcases_dir, PathBuf::from("/tmp/cases"));
        assert_eq!(cfg.timeout_secs, 2);
        assert_eq!(cfg.concurrency, 1);
        assert!(!cfg.skip_incomplete);
    }

    #[test]
    fn test_env_rejects_garbage() {
        assert!(CphConfig::default()
            .with_env(env(&[("CPH_TIMEOUT_SECS", "ten")]))
            .is_err());
        assert!(CphConfig::default()
            .with_env(env(&[("CPH_CONCURRENCY", "0")]))
            .is_err());
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "concurrency = 2\n").unwrap();
        let cfg = CphConfig::load(dir.path()).unwrap();
        assert_eq!(cfg.concurrency, 2);
    }
}
