//! Best-effort extraction of a JSON value embedded in model output.
//!
//! Completions arrive wrapped in code fences, stray backticks, HTML, or
//! prose. The extractor strips known markup, slices from the first opening
//! delimiter to the last closing one, and deserializes only that slice.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:json)?").expect("valid fence regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Which JSON container the caller expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Object,
    Array,
}

impl Shape {
    const fn delimiters(self) -> (char, char) {
        match self {
            Shape::Object => ('{', '}'),
            Shape::Array => ('[', ']'),
        }
    }
}

/// Result of an extraction attempt.
#[derive(Debug)]
pub enum Extracted<T> {
    Parsed(T),
    Unparsed(ParseError),
}

impl<T> Extracted<T> {
    #[must_use]
    pub fn ok(self) -> Option<T> {
        match self {
            Extracted::Parsed(value) => Some(value),
            Extracted::Unparsed(_) => None,
        }
    }

    #[must_use]
    pub fn is_parsed(&self) -> bool {
        matches!(self, Extracted::Parsed(_))
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no {open}...{close} block in model output")]
    NotFound { open: char, close: char },

    #[error("embedded JSON is invalid: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Remove markup noise around a completion.
///
/// Code fences and surrounding backticks are always removed. For arrays the
/// text is also stripped of HTML tags and flattened onto one line, since
/// index lists are sometimes returned inside `<p>` blocks.
#[must_use]
pub fn sanitize(text: &str, shape: Shape) -> String {
    let mut cleaned = FENCE_RE.replace_all(text, "").into_owned();
    if shape == Shape::Array {
        cleaned = TAG_RE.replace_all(&cleaned, "").replace(['\r', '\n'], " ");
    }
    cleaned
        .trim_matches(|c: char| c == '`' || c.is_whitespace())
        .to_string()
}

/// Extract and deserialize the embedded value of the given shape.
#[must_use]
pub fn extract<T: DeserializeOwned>(text: &str, shape: Shape) -> Extracted<T> {
    let cleaned = sanitize(text, shape);
    let (open, close) = shape.delimiters();

    let (Some(start), Some(end)) = (cleaned.find(open), cleaned.rfind(close)) else {
        return Extracted::Unparsed(ParseError::NotFound { open, close });
    };
    if end < start {
        return Extracted::Unparsed(ParseError::NotFound { open, close });
    }

    match serde_json::from_str::<T>(&cleaned[start..=end]) {
        Ok(value) => Extracted::Parsed(value),
        Err(e) => Extracted::Unparsed(ParseError::Invalid(e)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    #[test]
    fn plain_object_is_parsed() {
        let got: Extracted<Value> = extract(r#"{"a":1}"#, Shape::Object);
        assert_eq!(got.ok(), Some(serde_json::json!({"a": 1})));
    }

    #[test]
    fn fenced_object_is_parsed() {
        let text = "```json\n{\"category\": \"catering.bar\", \"keywords\": [\"jazz\"]}\n```";
        let got: Extracted<Value> = extract(text, Shape::Object);
        assert_eq!(
            got.ok().and_then(|v| v["category"].as_str().map(str::to_string)),
            Some("catering.bar".to_string())
        );
    }

    #[test]
    fn upper_case_fence_and_prose_are_ignored() {
        let text = "Sure! Here you go:\n```JSON\n{\"x\": true}\n``` hope that helps";
        let got: Extracted<Value> = extract(text, Shape::Object);
        assert!(got.is_parsed());
    }

    #[test]
    fn missing_braces_is_not_found() {
        let got: Extracted<Value> = extract("I could not decide.", Shape::Object);
        assert!(matches!(
            got,
            Extracted::Unparsed(ParseError::NotFound {
                open: '{',
                close: '}'
            })
        ));
    }

    #[test]
    fn reversed_delimiters_are_not_found() {
        let got: Extracted<Value> = extract("} nothing {", Shape::Object);
        assert!(matches!(got, Extracted::Unparsed(ParseError::NotFound { .. })));
    }

    #[test]
    fn truncated_json_is_invalid() {
        let got: Extracted<Value> = extract(r#"{"category": "catering.cafe", "keywords": [}"#, Shape::Object);
        assert!(matches!(got, Extracted::Unparsed(ParseError::Invalid(_))));
    }

    #[test]
    fn array_inside_html_is_parsed() {
        let got: Extracted<Vec<u32>> = extract("<p>[3,\n 1, 2]</p>", Shape::Array);
        assert_eq!(got.ok(), Some(vec![3, 1, 2]));
    }

    #[test]
    fn sanitize_strips_backticks_and_whitespace() {
        assert_eq!(sanitize("`` [1] ``\n", Shape::Array), "[1]");
    }

    #[test]
    fn sanitize_keeps_angle_brackets_for_objects() {
        let cleaned = sanitize(r#"{"note": "<3"}"#, Shape::Object);
        assert_eq!(cleaned, r#"{"note": "<3"}"#);
    }
}
