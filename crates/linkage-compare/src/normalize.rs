//! Text normalization shared by the string comparators.

use std::collections::BTreeSet;

use linkage_model::FieldValue;

/// Renders a value as comparable text.
///
/// Trims surrounding whitespace and optionally lowercases. Returns `None`
/// for null values.
pub fn normalize_text(value: &FieldValue, case_insensitive: bool) -> Option<String> {
    let text = value.as_text()?;
    let trimmed = text.trim();
    Some(if case_insensitive {
        trimmed.to_lowercase()
    } else {
        trimmed.to_string()
    })
}

/// Splits on runs of non-ASCII-alphanumeric characters and keeps tokens of
/// at least `min_token_len` characters.
///
/// With `min_token_len == 0` an empty token is kept when the text is empty
/// or starts or ends with a separator run.
pub fn tokens(text: &str, min_token_len: usize) -> BTreeSet<String> {
    let is_separator = |ch: char| !ch.is_ascii_alphanumeric();
    let mut found: BTreeSet<String> = text
        .split(is_separator)
        .filter(|token| !token.is_empty() && token.chars().count() >= min_token_len)
        .map(str::to_string)
        .collect();
    if min_token_len == 0
        && (text.is_empty() || text.starts_with(is_separator) || text.ends_with(is_separator))
    {
        found.insert(String::new());
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let value = FieldValue::from("  Jane DOE ");
        assert_eq!(normalize_text(&value, true).as_deref(), Some("jane doe"));
        assert_eq!(normalize_text(&value, false).as_deref(), Some("Jane DOE"));
        assert_eq!(normalize_text(&FieldValue::Null, true), None);
    }

    #[test]
    fn tokenizes_on_non_alphanumeric_runs() {
        let found = tokens("acme-corp, inc. / a", 2);
        let expected: BTreeSet<String> = ["acme", "corp", "inc"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(found, expected);
        assert_eq!(tokens("a b c", 1).len(), 3);
        assert!(tokens("--", 1).is_empty());
    }

    #[test]
    fn zero_min_length_keeps_edge_empty_token() {
        let as_vec = |set: BTreeSet<String>| set.into_iter().collect::<Vec<_>>();
        assert_eq!(as_vec(tokens("", 0)), vec![""]);
        assert_eq!(as_vec(tokens("-a-", 0)), vec!["", "a"]);
        assert_eq!(as_vec(tokens("a, b", 0)), vec!["a", "b"]);
        assert!(tokens("", 1).is_empty());
    }
}
