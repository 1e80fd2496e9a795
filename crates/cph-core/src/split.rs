//! Splitting raw example text into top-level argument tokens.
//!
//! Example text scraped from a problem page looks like
//! `nums = [2,7,11,15], target = 9`: positional arguments joined by commas,
//! optionally prefixed with a parameter name. Commas nested inside brackets
//! or braces belong to the enclosing value, so the splitter tracks bracket
//! depth and only treats a comma as a separator at depth zero.
//!
//! Design-problem pages sometimes print the method-name list and the
//! argument list back to back (`["A","b"][[],[1]]`). [`repair_adjacent_groups`]
//! rewrites every `][` into `],[` before splitting so the two groups come
//! out as separate tokens. It is a lexical repair for that one upstream
//! shape, not delimiter inference.

/// Rewrite every literal `][` adjacency into `],[`.
pub fn repair_adjacent_groups(raw: &str) -> String {
    raw.replace("][", "],[")
}

/// Split `raw` into its ordered top-level argument tokens.
///
/// Each flushed token has any `name =` prefix removed, is trimmed, and
/// loses a single trailing comma. Empty tokens are dropped.
///
/// The last character always flushes the accumulator, even when brackets
/// are left unbalanced; the caller then receives whatever was accumulated.
pub fn split(raw: &str) -> Vec<String> {
    let text = repair_adjacent_groups(raw);
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;
    let mut scan = QuoteState::default();

    for (idx, ch) in text.char_indices() {
        let quoted = scan.advance(ch);
        if !quoted {
            match ch {
                '[' | '{' => depth += 1,
                ']' | '}' => depth -= 1,
                _ => {}
            }
        }
        current.push(ch);

        let at_end = idx + ch.len_utf8() == text.len();
        if (ch == ',' && depth == 0 && !quoted) || at_end {
            if let Some(token) = clean_token(&current) {
                tokens.push(token);
            }
            current.clear();
        }
    }

    tokens
}

/// Strip the name prefix and trailing comma from an accumulated token.
fn clean_token(raw: &str) -> Option<String> {
    let value = strip_name_prefix(raw).trim();
    let value = value.strip_suffix(',').unwrap_or(value).trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Keep only what follows the last unquoted `=`.
fn strip_name_prefix(token: &str) -> &str {
    let mut scan = QuoteState::default();
    let mut cut = None;
    for (idx, ch) in token.char_indices() {
        let quoted = scan.advance(ch);
        if ch == '=' && !quoted {
            cut = Some(idx + ch.len_utf8());
        }
    }
    match cut {
        Some(start) => &token[start..],
        None => token,
    }
}

/// Tracks whether the scanner is inside a double-quoted string literal.
#[derive(Debug, Default)]
struct QuoteState {
    inside: bool,
    escaped: bool,
}

impl QuoteState {
    /// Feed one character; returns `true` when `ch` is part of a string
    /// literal (including its delimiting quotes).
    fn advance(&mut self, ch: char) -> bool {
        if self.inside {
            if self.escaped {
                self.escaped = false;
            } else if ch == '\\' {
                self.escaped = true;
            } else if ch == '"' {
                self.inside = false;
            }
            true
        } else if ch == '"' {
            self.inside = true;
            true
        } else {
            false
        }
    }
}
