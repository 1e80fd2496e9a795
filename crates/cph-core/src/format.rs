//! Line-oriented fixture rendering.
//!
//! The on-disk format is deliberately dumb so that any solution template can
//! read it with primitive string splitting:
//!
//! - scalar: its literal form on one line
//! - flat array: elements separated by single spaces on one line
//! - matrix (array of arrays): one row per line, elements space-separated
//!
//! Type information is dropped; the same structural shape always produces
//! the same line layout.

use crate::value::CanonicalValue;

/// Render one value as its fixture lines.
pub fn value_lines(value: &CanonicalValue) -> Vec<String> {
    match value {
        CanonicalValue::Array(rows) if value.is_matrix() => rows
            .iter()
            .map(|row| row.leaf_tokens().join(" "))
            .collect(),
        CanonicalValue::Array(_) => vec![value.leaf_tokens().join(" ")],
        scalar => vec![scalar.to_string()],
    }
}

/// Render an argument sequence as one fixture file body.
pub fn format_values(values: &[CanonicalValue]) -> String {
    values
        .iter()
        .flat_map(value_lines)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::coerce;

    fn fmt(tokens: &[&str]) -> String {
        let values: Vec<_> = tokens.iter().map(|t| coerce(t)).collect();
        format_values(&values)
    }

    #[test]
    fn test_flat_array() {
        assert_eq!(fmt(&["[1,2,3]"]), "1 2 3");
    }

    #[test]
    fn test_array_then_scalar() {
        assert_eq!(fmt(&["[1,2]", "3"]), "1 2\n3");
    }

    #[test]
    fn test_matrix_rows() {
        assert_eq!(fmt(&["[[1,2],[3,4]]"]), "1 2\n3 4");
    }

    #[test]
    fn test_string_elements_lose_quotes() {
        assert_eq!(fmt(&[r#"["ab","cd"]"#, "\"x\""]), "ab cd\nx");
    }

    #[test]
    fn test_null_and_float() {
        assert_eq!(fmt(&["[1,null,2.5]"]), "1 null 2.5");
    }

    #[test]
    fn test_empty_array_is_blank_line() {
        assert_eq!(fmt(&["[]", "5"]), "\n5");
        assert_eq!(fmt(&["5", "[]"]), "5");
    }

    #[test]
    fn test_mixed_array_flattens_to_one_line() {
        assert_eq!(fmt(&["[1,[2,3]]"]), "1 2 3");
    }

    #[test]
    fn test_unparsed_text_passes_through() {
        assert_eq!(fmt(&["[1,2"]), "[1,2");
    }

    #[test]
    fn test_matrix_row_count_preserved() {
        for (token, rows) in [("[[1]]", 1), ("[[1,2],[3,4]]", 2), ("[[1],[2],[3,4,5]]", 3)] {
            assert_eq!(fmt(&[token]).lines().count(), rows, "token {token}");
        }
    }

    #[test]
    fn test_trailing_empty_rows_are_trimmed() {
        // The body is trimmed of trailing whitespace, so empty rows at the
        // end of the last value vanish. Leading and inner empty rows stay.
        assert_eq!(fmt(&["[[1],[]]"]), "1");
        assert_eq!(fmt(&["[[],[1],[]]"]), "\n1");
        assert_eq!(fmt(&["[[],[1],[2],[]]"]).lines().count(), 3);
        // An empty row followed by another value keeps its line.
        assert_eq!(fmt(&["[[1],[]]", "2"]), "1\n\n2");
    }

    #[test]
    fn test_same_shape_same_layout() {
        let a = fmt(&["[[9,8],[7,6]]", "[5]"]);
        let b = fmt(&["[[1,2],[3,4]]", "[0]"]);
        let shape = |s: &str| s.lines().map(|l| l.split(' ').count()).collect::<Vec<_>>();
        assert_eq!(shape(&a), shape(&b));
    }
}
