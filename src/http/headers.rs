//! Header list helpers
//!
//! Splits comma-separated header values (entity-tag lists) the way
//! conditional request headers need them.

use hyper::header::HeaderName;
use hyper::HeaderMap;

/// Collect the comma-separated values of every `name` header line
///
/// Commas inside quoted strings do not split. Each value is trimmed and
/// de-quoted; empty elements are skipped. Returns `None` when the header
/// is absent, so callers can tell "absent" from "present but empty".
/// Lines that are not visible ASCII contribute no values.
pub fn comma_separated_values(headers: &HeaderMap, name: &HeaderName) -> Option<Vec<String>> {
    let mut lines = headers.get_all(name).iter().peekable();
    lines.peek()?;

    let mut values = Vec::new();
    for line in lines {
        if let Ok(line) = line.to_str() {
            values.extend(split_quoted(line).map(|v| dequote(v).to_string()));
        }
    }
    Some(values)
}

/// Get a single header as trimmed text, `None` when absent, blank or not ASCII
pub fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Remove one pair of surrounding double quotes, if present
pub fn dequote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn split_quoted(line: &str) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&line[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&line[start..]);
    parts.into_iter().map(str::trim).filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::{HeaderValue, IF_MATCH, IF_NONE_MATCH};

    #[test]
    fn test_absent_header() {
        let headers = HeaderMap::new();
        assert_eq!(comma_separated_values(&headers, &IF_MATCH), None);
    }

    #[test]
    fn test_present_but_empty() {
        let mut headers = HeaderMap::new();
        headers.insert(IF_MATCH, HeaderValue::from_static(""));
        assert_eq!(comma_separated_values(&headers, &IF_MATCH), Some(vec![]));
    }

    #[test]
    fn test_split_and_dequote() {
        let mut headers = HeaderMap::new();
        headers.insert(
            IF_NONE_MATCH,
            HeaderValue::from_static("\"abc\", \"d,ef\" ,*,, xyz"),
        );
        assert_eq!(
            comma_separated_values(&headers, &IF_NONE_MATCH),
            Some(vec![
                "abc".to_string(),
                "d,ef".to_string(),
                "*".to_string(),
                "xyz".to_string()
            ])
        );
    }

    #[test]
    fn test_multiple_lines_combined() {
        let mut headers = HeaderMap::new();
        headers.append(IF_MATCH, HeaderValue::from_static("\"a\""));
        headers.append(IF_MATCH, HeaderValue::from_static("\"b\", \"c\""));
        assert_eq!(
            comma_separated_values(&headers, &IF_MATCH).map(|v| v.len()),
            Some(3)
        );
    }

    #[test]
    fn test_dequote() {
        assert_eq!(dequote("\"abc\""), "abc");
        assert_eq!(dequote("abc"), "abc");
        assert_eq!(dequote("W/\"abc\""), "W/\"abc\"");
        assert_eq!(dequote("\""), "\"");
    }

    #[test]
    fn test_header_str_blank() {
        let mut headers = HeaderMap::new();
        headers.insert(IF_MATCH, HeaderValue::from_static("   "));
        assert_eq!(header_str(&headers, &IF_MATCH), None);
    }
}
