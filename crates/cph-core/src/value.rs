//! Canonical values and the coercion cascade applied to each token.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A de-stringified argument or result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CanonicalValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Array(Vec<CanonicalValue>),
    Null,
}

/// Ordered positional arguments extracted from one example.
pub type ArgumentSequence = Vec<CanonicalValue>;

impl CanonicalValue {
    /// Whether this value is an array whose elements are all arrays.
    pub fn is_matrix(&self) -> bool {
        match self {
            CanonicalValue::Array(items) => {
                !items.is_empty() && items.iter().all(|v| matches!(v, CanonicalValue::Array(_)))
            }
            _ => false,
        }
    }

    /// Scalar tokens in document order, descending through nested arrays.
    pub fn leaf_tokens(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<String>) {
        match self {
            CanonicalValue::Array(items) => {
                for item in items {
                    item.collect_leaves(out);
                }
            }
            scalar => out.push(scalar.to_string()),
        }
    }
}

/// Literal string form. Arrays render bracketed and comma-joined; floats
/// always keep a decimal point so they re-coerce as floats.
impl fmt::Display for CanonicalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalValue::Integer(n) => write!(f, "{n}"),
            CanonicalValue::Float(x) => {
                let text = x.to_string();
                if x.is_finite() && !text.contains(|c| matches!(c, '.' | 'e' | 'E')) {
                    write!(f, "{text}.0")
                } else {
                    f.write_str(&text)
                }
            }
            CanonicalValue::Text(s) => f.write_str(s),
            CanonicalValue::Null => f.write_str("null"),
            CanonicalValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Coerce one top-level token into a [`CanonicalValue`].
///
/// Attempts, first success wins:
/// 1. `[`/`{` prefix: structured literal, else the token verbatim as text.
/// 2. a single pair of wrapping double quotes: the unquoted text.
/// 3. a whole base-10 numeral: integer or float.
/// 4. the token verbatim as text.
///
/// Never fails. Floats are stored as values, not text, so their written
/// form is normalised: `2.00000` becomes `2.0` and `1e3` becomes `1000.0`.
pub fn coerce(token: &str) -> CanonicalValue {
    if token.starts_with('[') || token.starts_with('{') {
        return parse_structured(token).unwrap_or_else(|| CanonicalValue::Text(token.to_string()));
    }
    if let Some(inner) = unquote(token) {
        return CanonicalValue::Text(inner.to_string());
    }
    if token == "null" {
        return CanonicalValue::Null;
    }
    if let Some(number) = parse_numeral(token) {
        return number;
    }
    CanonicalValue::Text(token.to_string())
}

/// Coerce every token of a split example.
pub fn coerce_all<I, S>(tokens: I) -> ArgumentSequence
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens.into_iter().map(|t| coerce(t.as_ref())).collect()
}

fn unquote(token: &str) -> Option<&str> {
    let inner = token.strip_prefix('"')?.strip_suffix('"')?;
    if inner.contains('"') {
        None
    } else {
        Some(inner)
    }
}

/// Accepts `-?digits(.digits)?([eE][+-]?digits)?`. Integers that overflow
/// `i64` are left to the text fallback so no digits are lost.
fn parse_numeral(token: &str) -> Option<CanonicalValue> {
    let bytes = token.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == int_start {
        return None;
    }
    let mut is_float = false;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return None;
        }
        is_float = true;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
        is_float = true;
    }
    if i != bytes.len() {
        return None;
    }

    if is_float {
        token.parse::<f64>().ok().map(CanonicalValue::Float)
    } else {
        token.parse::<i64>().ok().map(CanonicalValue::Integer)
    }
}

fn parse_structured(token: &str) -> Option<CanonicalValue> {
    let json: serde_json::Value = serde_json::from_str(token).ok()?;
    from_json(json)
}

/// Objects have no canonical form; a token containing one stays text.
fn from_json(json: serde_json::Value) -> Option<CanonicalValue> {
    use serde_json::Value;

    match json {
        Value::Null => Some(CanonicalValue::Null),
        Value::Bool(b) => Some(CanonicalValue::Text(b.to_string())),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(CanonicalValue::Integer(i)),
            None => {
                // With arbitrary precision the original literal is kept, so
                // an integer too wide for i64 stays text like it does at the
                // top level.
                let literal = n.to_string();
                if literal.contains(|c| matches!(c, '.' | 'e' | 'E')) {
                    n.as_f64().map(CanonicalValue::Float)
                } else {
                    Some(CanonicalValue::Text(literal))
                }
            }
        },
        Value::String(s) => Some(CanonicalValue::Text(s)),
        Value::Array(items) => items
            .into_iter()
            .map(from_json)
            .collect::<Option<Vec<_>>>()
            .map(CanonicalValue::Array),
        Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CanonicalValue::*;

    #[test]
    fn test_integer_and_float() {
        assert_eq!(coerce("42"), Integer(42));
        assert_eq!(coerce("-7"), Integer(-7));
        assert_eq!(coerce("2.5"), Float(2.5));
        assert_eq!(coerce("1e3"), Float(1000.0));
    }

    #[test]
    fn test_non_numerals_stay_text() {
        assert_eq!(coerce("inf"), Text("inf".into()));
        assert_eq!(coerce("NaN"), Text("NaN".into()));
        assert_eq!(coerce("1."), Text("1.".into()));
        assert_eq!(coerce("12abc"), Text("12abc".into()));
        assert_eq!(coerce("true"), Text("true".into()));
    }

    #[test]
    fn test_overflowing_integer_keeps_digits() {
        assert_eq!(
            coerce("123456789012345678901234"),
            Text("123456789012345678901234".into())
        );
    }

    #[test]
    fn test_overflowing_integer_inside_array_keeps_digits() {
        assert_eq!(
            coerce("[12345678901234567890123]"),
            Array(vec![Text("12345678901234567890123".into())])
        );
        assert_eq!(
            coerce("[1,18446744073709551615]"),
            Array(vec![Integer(1), Text("18446744073709551615".into())])
        );
        assert_eq!(coerce("[2.5,1e3]"), Array(vec![Float(2.5), Float(1000.0)]));
    }

    #[test]
    fn test_float_precision_is_normalised() {
        assert_eq!(coerce("2.00000").to_string(), "2.0");
        assert_eq!(coerce("[1.50000]").to_string(), "[1.5]");
    }

    #[test]
    fn test_quoted_string() {
        assert_eq!(coerce("\"abc\""), Text("abc".into()));
        assert_eq!(coerce("\"42\""), Text("42".into()));
        assert_eq!(coerce("\"\""), Text(String::new()));
    }

    #[test]
    fn test_null() {
        assert_eq!(coerce("null"), Null);
        assert_eq!(coerce("[1,null,2]"), Array(vec![Integer(1), Null, Integer(2)]));
    }

    #[test]
    fn test_arrays_and_matrices() {
        assert_eq!(
            coerce("[1,2,3]"),
            Array(vec![Integer(1), Integer(2), Integer(3)])
        );
        let m = coerce("[[1,2],[3,4]]");
        assert!(m.is_matrix());
        assert_eq!(
            coerce(r#"["a","b"]"#),
            Array(vec![Text("a".into()), Text("b".into())])
        );
        assert_eq!(coerce("[]"), Array(vec![]));
        assert!(!coerce("[]").is_matrix());
    }

    #[test]
    fn test_malformed_structure_falls_back_to_text() {
        assert_eq!(coerce("[1,2"), Text("[1,2".into()));
        assert_eq!(coerce("{1,2}"), Text("{1,2}".into()));
        assert_eq!(coerce(r#"{"a":1}"#), Text(r#"{"a":1}"#.into()));
    }

    #[test]
    fn test_structured_checked_before_quotes() {
        // a bracketed token is never treated as a quoted string
        assert_eq!(coerce(r#"["x"]"#), Array(vec![Text("x".into())]));
    }

    #[test]
    fn test_render_is_idempotent_for_scalars() {
        for raw in ["5", "-3", "2.0", "0.125", "1e-7", "\"hi\"", "word", "null"] {
            let once = coerce(raw);
            assert_eq!(coerce(&once.to_string()), once, "token {raw}");
        }
    }

    #[test]
    fn test_float_display_keeps_point() {
        assert_eq!(Float(2.0).to_string(), "2.0");
        assert_eq!(Float(0.5).to_string(), "0.5");
    }

    #[test]
    fn test_leaf_tokens() {
        let v = coerce("[[1,2],[3,[4]]]");
        assert_eq!(v.leaf_tokens(), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_coerce_all_preserves_order() {
        let seq = coerce_all(["[1,2]", "3"]);
        assert_eq!(seq, vec![Array(vec![Integer(1), Integer(2)]), Integer(3)]);
    }
}
