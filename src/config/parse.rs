//! Primitive value parsers for environment variables.
//!
//! None of these fail: malformed input falls back to the supplied default.

use std::str::FromStr;

/// Parse an integer, returning `default` for empty or malformed input.
pub fn parse_integer<T: FromStr>(raw: &str, default: T) -> T {
    let raw = raw.trim();
    if raw.is_empty() {
        return default;
    }
    raw.parse().unwrap_or(default)
}

/// Parse a boolean.
///
/// Recognized tokens (case-insensitive): `true`/`false`, `1`/`0`,
/// `yes`/`no`, `on`/`off`. Anything else yields `default`.
pub fn parse_boolean(raw: &str, default: bool) -> bool {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => default,
    }
}

/// Parse a comma-separated list, trimming items and dropping empty ones.
///
/// Returns `default` unchanged when nothing survives.
pub fn parse_array(raw: &str, default: Vec<String>) -> Vec<String> {
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect();

    if items.is_empty() {
        default
    } else {
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("abc", 7), 7);
        assert_eq!(parse_integer("42", 7), 42);
        assert_eq!(parse_integer("", 7), 7);
        assert_eq!(parse_integer(" 8080 ", 7), 8080);
        assert_eq!(parse_integer("-3", 7i64), -3);
        // Negative input does not fit an unsigned field.
        assert_eq!(parse_integer("-3", 10u64), 10);
    }

    #[test]
    fn test_parse_boolean() {
        assert!(parse_boolean("TRUE", false));
        assert!(!parse_boolean("no", true));
        assert!(parse_boolean("", true));
        assert!(parse_boolean("On", false));
        assert!(!parse_boolean("0", true));
        assert!(parse_boolean("maybe", true));
    }

    #[test]
    fn test_parse_array() {
        assert_eq!(parse_array(" a, b ,,c", vec![]), vec!["a", "b", "c"]);
        assert_eq!(parse_array("", vec!["*".to_string()]), vec!["*"]);
        assert_eq!(parse_array(" , ,", vec!["x".to_string()]), vec!["x"]);
    }
}
