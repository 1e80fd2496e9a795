//! Supported languages and the commands used to build and run them.
//!
//! Command templates may use these placeholders:
//! - `{source}`   absolute path of the solution file
//! - `{dir}`      directory containing the solution file
//! - `{stem}`     solution file name without extension
//! - `{artifact}` absolute path of the compiled artifact

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RunError;

/// Builtin languages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// g++ -o user_solution main.cpp && ./user_solution
    Cpp,

    /// javac Main.java && java -cp <dir> Main
    Java,

    /// python3 main.py
    Python,

    /// node main.js
    JavaScript,
}

impl Language {
    /// Canonical identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Python => "python",
            Language::JavaScript => "javascript",
        }
    }

    /// Required solution file extension, dot included.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Cpp => ".cpp",
            Language::Java => ".java",
            Language::Python => ".py",
            Language::JavaScript => ".js",
        }
    }

    pub fn is_compiled(&self) -> bool {
        matches!(self, Language::Cpp | Language::Java)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = RunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpp" | "c++" => Ok(Language::Cpp),
            "java" => Ok(Language::Java),
            "python" | "py" => Ok(Language::Python),
            "javascript" | "js" | "node" => Ok(Language::JavaScript),
            other => Err(RunError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Resolved build/run recipe for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSpec {
    /// Identifier; also the key of the per-language execution lock.
    pub id: String,

    /// Required solution file extension, dot included.
    pub extension: String,

    /// Optional compile command.
    pub compile: Option<Vec<String>>,

    /// Run command; stdin is the input fixture, stdout the output file.
    pub run: Vec<String>,

    /// Compiled artifact, relative to the solution directory.
    pub artifact: Option<String>,
}

impl LanguageSpec {
    /// Recipe for a builtin language. `python` is the interpreter command.
    pub fn from_builtin(language: Language, python: &str) -> Self {
        let strings = |parts: &[&str]| parts.iter().map(|p| p.to_string()).collect::<Vec<_>>();
        let (compile, run, artifact) = match language {
            Language::Cpp => (
                Some(strings(&["g++", "-o", "{artifact}", "{source}"])),
                strings(&["{artifact}"]),
                Some(compiled_binary_name().to_string()),
            ),
            Language::Java => (
                Some(strings(&["javac", "{source}"])),
                strings(&["java", "-cp", "{dir}", "{stem}"]),
                Some("{stem}.class".to_string()),
            ),
            Language::Python => (None, vec![python.to_string(), "{source}".to_string()], None),
            Language::JavaScript => (None, strings(&["node", "{source}"]), None),
        };

        Self {
            id: language.name().to_string(),
            extension: language.extension().to_string(),
            compile,
            run,
            artifact,
        }
    }

    /// A custom recipe.
    pub fn custom(id: &str, extension: &str, run: Vec<String>) -> Self {
        Self {
            id: id.to_string(),
            extension: extension.to_string(),
            compile: None,
            run,
            artifact: None,
        }
    }

    /// Add a compile step producing `artifact`.
    pub fn with_compile(mut self, compile: Vec<String>, artifact: &str) -> Self {
        self.compile = Some(compile);
        self.artifact = Some(artifact.to_string());
        self
    }

    /// Parse a language identifier and build its recipe.
    pub fn resolve(id: &str, python: &str) -> Result<Self, RunError> {
        Ok(Self::from_builtin(id.parse()?, python))
    }

    pub fn is_compiled(&self) -> bool {
        self.compile.is_some()
    }

    /// Check that `solution` carries this language's extension.
    pub fn check_extension(&self, solution: &Path) -> Result<(), RunError> {
        let name = solution
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if name.ends_with(&self.extension) && name.len() > self.extension.len() {
            Ok(())
        } else {
            Err(RunError::ExtensionMismatch {
                expected: self.extension.clone(),
                actual: solution
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_else(|| "no extension".to_string()),
            })
        }
    }
}

/// Fixed name of the compiled C++ binary.
fn compiled_binary_name() -> &'static str {
    if cfg!(windows) {
        "user_solution.exe"
    } else {
        "user_solution"
    }
}

/// Substitute placeholders in every part of a command template.
pub fn expand(template: &[String], vars: &TemplateVars) -> Vec<String> {
    template.iter().map(|part| vars.apply(part)).collect()
}

/// Values substituted into command templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    pub source: String,
    pub dir: String,
    pub stem: String,
    pub artifact: String,
}

impl TemplateVars {
    pub fn apply(&self, part: &str) -> String {
        part.replace("{source}", &self.source)
            .replace("{dir}", &self.dir)
            .replace("{stem}", &self.stem)
            .replace("{artifact}", &self.artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_language_names_and_extensions() {
        assert_eq!(Language::Cpp.name(), "cpp");
        assert_eq!(Language::Java.extension(), ".java");
        assert_eq!(Language::Python.extension(), ".py");
        assert_eq!(Language::JavaScript.extension(), ".js");
        assert!(Language::Cpp.is_compiled());
        assert!(!Language::Python.is_compiled());
    }

    #[test]
    fn test_parse_language() {
        assert_eq!("CPP".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("c++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("py".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("node".parse::<Language>().unwrap(), Language::JavaScript);
        assert!(matches!(
            "rust".parse::<Language>(),
            Err(RunError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_builtin_specs() {
        let cpp = LanguageSpec::from_builtin(Language::Cpp, "python3");
        assert!(cpp.is_compiled());
        assert_eq!(cpp.run, vec!["{artifact}"]);

        let py = LanguageSpec::from_builtin(Language::Python, "pypy3");
        assert!(!py.is_compiled());
        assert_eq!(py.run[0], "pypy3");
        assert!(py.artifact.is_none());
    }

    #[test]
    fn test_check_extension() {
        let py = LanguageSpec::resolve("python", "python3").unwrap();
        assert!(py.check_extension(&PathBuf::from("user_solutions/main.py")).is_ok());

        let err = py
            .check_extension(&PathBuf::from("user_solutions/main.cpp"))
            .unwrap_err();
        assert!(matches!(
            err,
            RunError::ExtensionMismatch { ref expected, ref actual } if expected == ".py" && actual == ".cpp"
        ));
        assert!(py.check_extension(&PathBuf::from(".py")).is_err());
        assert!(py.check_extension(&PathBuf::from("main")).is_err());
    }

    #[test]
    fn test_expand_template() {
        let vars = TemplateVars {
            source: "/w/Main.java".into(),
            dir: "/w".into(),
            stem: "Main".into(),
            artifact: "/w/Main.class".into(),
        };
        let java = LanguageSpec::from_builtin(Language::Java, "python3");
        assert_eq!(expand(&java.run, &vars), vec!["java", "-cp", "/w", "Main"]);
        assert_eq!(vars.apply("{stem}.class"), "Main.class");
    }
}
