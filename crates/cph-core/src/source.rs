//! Example acquisition: where raw input/output text comes from.
//!
//! The only contract with the rest of the crate is [`RawExamples`]: two
//! parallel lists of raw example text. [`RawExamples::into_cases`] enforces
//! equal lengths before anything reaches the fixture store.

use std::path::PathBuf;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::error::{FixtureError, Result};
use crate::store::ExampleCase;

const QUESTION_QUERY: &str =
    "query questionContent($titleSlug: String!) { question(titleSlug: $titleSlug) { content } }";

/// Raw example text as scraped, before any normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExamples {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl RawExamples {
    pub fn new(inputs: Vec<String>, outputs: Vec<String>) -> Self {
        Self { inputs, outputs }
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() || self.outputs.is_empty()
    }

    /// Pair inputs with outputs and normalize both sides.
    pub fn into_cases(self) -> Result<Vec<ExampleCase>> {
        if self.is_empty() {
            return Err(FixtureError::NoExamples);
        }
        if self.inputs.len() != self.outputs.len() {
            return Err(FixtureError::CountMismatch {
                inputs: self.inputs.len(),
                outputs: self.outputs.len(),
            });
        }
        Ok(self
            .inputs
            .iter()
            .zip(&self.outputs)
            .map(|(input, output)| ExampleCase::from_raw(input, output))
            .collect())
    }
}

/// A provider of raw examples for a named problem.
#[async_trait]
pub trait ExampleSource: Send + Sync {
    async fn fetch(&self, problem: &str) -> Result<RawExamples>;
}

/// Fetches problem content from the LeetCode GraphQL API.
pub struct LeetCodeSource {
    client: reqwest::Client,
    endpoint: String,
}

impl LeetCodeSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ExampleSource for LeetCodeSource {
    async fn fetch(&self, problem: &str) -> Result<RawExamples> {
        let slug = problem_slug(problem);
        info!(slug = %slug, endpoint = %self.endpoint, "Fetching problem content");

        let body = json!({
            "query": QUESTION_QUERY,
            "variables": { "titleSlug": slug },
        });
        let response: serde_json::Value = self
            .client
            .post(&self.endpoint)
            .header("Referer", format!("https://leetcode.com/problems/{slug}/"))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let content = response["data"]["question"]["content"]
            .as_str()
            .ok_or_else(|| FixtureError::ProblemNotFound(slug.clone()))?;

        let examples = extract_examples(content);
        debug!(inputs = ?examples.inputs, outputs = ?examples.outputs, "Extracted examples");
        if examples.is_empty() {
            return Err(FixtureError::NoExamples);
        }
        Ok(examples)
    }
}

/// Reads a saved problem page from disk. The problem name is ignored.
pub struct HtmlFileSource {
    path: PathBuf,
}

impl HtmlFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ExampleSource for HtmlFileSource {
    async fn fetch(&self, _problem: &str) -> Result<RawExamples> {
        info!(path = %self.path.display(), "Reading problem page from file");
        let html = tokio::fs::read_to_string(&self.path).await?;
        let examples = extract_examples(&html);
        if examples.is_empty() {
            return Err(FixtureError::NoExamples);
        }
        Ok(examples)
    }
}

/// Accept either a bare slug (`two-sum`) or a problem URL.
pub fn problem_slug(problem: &str) -> String {
    let trimmed = problem.trim().trim_end_matches('/');
    match trimmed.split_once("/problems/") {
        Some((_, rest)) => rest.split('/').next().unwrap_or(rest).to_string(),
        None => trimmed.to_string(),
    }
}

/// Extract example inputs and outputs from problem HTML.
///
/// Looks at `<pre>` blocks and `example-block` containers. Within each block
/// the input is the text between `Input:` and `Output:`; the output is the
/// first line after `Output:`. Inputs and outputs are collected
/// independently, so a malformed block can leave the two lists uneven.
pub fn extract_examples(html: &str) -> RawExamples {
    let mut examples = RawExamples::default();

    for caps in block_regex().captures_iter(html) {
        let Some(inner) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        let text = html_to_text(inner.as_str());
        let text = text.trim();

        if let Some(input) = input_regex().captures(text).and_then(|c| c.get(1)) {
            let input = input.as_str().trim();
            if !input.is_empty() {
                examples.inputs.push(input.to_string());
            }
        }
        if let Some(output) = output_regex().captures(text).and_then(|c| c.get(1)) {
            let first_line = output.as_str().lines().next().unwrap_or("").trim();
            if !first_line.is_empty() {
                examples.outputs.push(first_line.to_string());
            }
        }
    }

    examples
}

fn block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<pre[^>]*>(.*?)</pre>|<div[^>]*class="example-block"[^>]*>(.*?)</div>"#)
            .expect("valid block pattern")
    })
}

fn input_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)Input:?\s*(.*?)Output:?").expect("valid input pattern"))
}

fn output_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)Output:?\s*(.*)").expect("valid output pattern"))
}

fn html_to_text(fragment: &str) -> String {
    static BREAKS: OnceLock<Regex> = OnceLock::new();
    static TAGS: OnceLock<Regex> = OnceLock::new();
    let breaks = BREAKS
        .get_or_init(|| Regex::new(r"(?i)<br\s*/?>|</p>|</div>").expect("valid break pattern"));
    let tags = TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

    let text = breaks.replace_all(fragment, "\n");
    let text = tags.replace_all(&text, "");
    decode_entities(&text)
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
