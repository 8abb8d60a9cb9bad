//! Query interpreter: free text in, allow-listed category plus keywords out.

use mapassist_core::defaults::{DEFAULT_CATEGORY, MAX_KEYWORDS, MIN_KEYWORDS};
use mapassist_core::{InterpretedIntent, PlaceCategory};
use serde::Deserialize;
use serde_json::Value;

use crate::client::GeminiClient;
use crate::extract::{extract, Extracted, Shape};

/// Turns a natural-language query into an [`InterpretedIntent`].
///
/// Never fails: a missing client, a failed call, or an unparseable answer
/// all degrade to the default category with keywords synthesized from the
/// query itself.
#[derive(Debug, Clone)]
pub struct QueryInterpreter {
    client: Option<GeminiClient>,
}

#[derive(Debug, Deserialize)]
struct RawIntent {
    #[serde(default)]
    category: Value,
    #[serde(default)]
    keywords: Value,
}

impl QueryInterpreter {
    #[must_use]
    pub fn new(client: Option<GeminiClient>) -> Self {
        Self { client }
    }

    pub async fn interpret(&self, query: &str) -> InterpretedIntent {
        let Some(client) = &self.client else {
            tracing::debug!("generative model unavailable, using fallback intent");
            return InterpretedIntent::fallback().finalize(query);
        };

        let intent = match client.generate(&build_prompt(query)).await {
            Ok(text) => parse_intent(&text),
            Err(e) => {
                tracing::warn!(
                    stage = "interpret",
                    model = client.model(),
                    error = %e,
                    "query interpretation call failed"
                );
                InterpretedIntent::fallback()
            }
        };

        let intent = intent.finalize(query);
        tracing::debug!(
            category = %intent.category,
            keywords = ?intent.keywords,
            "query interpreted"
        );
        intent
    }
}

/// Parse a raw completion into an intent, before the keyword policy runs.
///
/// Unknown or missing categories become [`DEFAULT_CATEGORY`]; keywords may
/// be an array or a comma-separated string.
#[must_use]
pub fn parse_intent(text: &str) -> InterpretedIntent {
    let raw = match extract::<RawIntent>(text, Shape::Object) {
        Extracted::Parsed(raw) => raw,
        Extracted::Unparsed(e) => {
            tracing::warn!(stage = "interpret", error = %e, "model answer is not a JSON object");
            return InterpretedIntent::fallback();
        }
    };

    let category = raw
        .category
        .as_str()
        .and_then(PlaceCategory::parse)
        .unwrap_or_else(|| {
            tracing::debug!(category = %raw.category, "category outside allow-list, using default");
            DEFAULT_CATEGORY
        });

    let keywords = match raw.keywords {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(joined) => joined.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    InterpretedIntent { category, keywords }
}

fn build_prompt(query: &str) -> String {
    let categories = PlaceCategory::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You analyse search requests typed into a map app that finds places nearby.

The user describes what they want in natural language, for example:
- "cosy cafe with wi-fi and sockets to work"
- "bar with live music and cocktails"
- "park for a morning run"

Your task:
1. Pick exactly one category from this list: {categories}
2. Extract {MIN_KEYWORDS} to {MAX_KEYWORDS} short keywords describing what the user wants
   (atmosphere, budget, wi-fi, quiet, view, late hours, and so on).
   Keep the keywords in the language of the request.
3. Answer with JSON only, no explanations:
{{"category": "catering.cafe", "keywords": ["cosy", "wifi", "sockets"]}}

User request:
"{query}""#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clean_answer() {
        let intent = parse_intent(r#"{"category":"catering.cafe","keywords":["тихе","wifi"]}"#);
        assert_eq!(intent.category, PlaceCategory::Cafe);
        assert_eq!(intent.keywords, vec!["тихе", "wifi"]);
    }

    #[test]
    fn non_json_answer_falls_back() {
        let intent = parse_intent("I think you want a cafe.");
        assert_eq!(intent, InterpretedIntent::fallback());
    }

    #[test]
    fn truncated_json_falls_back() {
        let intent = parse_intent(r#"{"category": "catering.bar", "keywords": ["#);
        assert_eq!(intent, InterpretedIntent::fallback());
    }

    #[test]
    fn unknown_category_becomes_default() {
        let intent = parse_intent(r#"{"category":"space.station","keywords":["zero-g","view"]}"#);
        assert_eq!(intent.category, DEFAULT_CATEGORY);
        assert_eq!(intent.keywords.len(), 2);
    }

    #[test]
    fn non_string_category_becomes_default() {
        let intent = parse_intent(r#"{"category": 42, "keywords": []}"#);
        assert_eq!(intent.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn bare_leaf_category_is_resolved() {
        let intent = parse_intent(r#"{"category":"park","keywords":["run","morning"]}"#);
        assert_eq!(intent.category, PlaceCategory::Park);
    }

    #[test]
    fn comma_separated_keywords_are_split() {
        let intent = parse_intent(r#"{"category":"catering.bar","keywords":"jazz, cocktails"}"#);
        assert_eq!(intent.keywords, vec!["jazz", " cocktails"]);
    }

    #[test]
    fn missing_fields_still_finalize_to_valid_intent() {
        let intent = parse_intent(r#"{"answer": "cafe"}"#).finalize("quiet cafe");
        assert_eq!(intent.category, DEFAULT_CATEGORY);
        assert!(!intent.keywords.is_empty());
    }

    #[test]
    fn prompt_embeds_query_and_allow_list() {
        let prompt = build_prompt("romantic dinner");
        assert!(prompt.contains("\"romantic dinner\""));
        assert!(prompt.contains("catering.restaurant"));
        assert!(prompt.contains("tourism.sights"));
        assert!(prompt.contains("2 to 6"));
    }

    #[tokio::test]
    async fn interpreter_without_client_degrades() {
        let intent = QueryInterpreter::new(None).interpret("24h pharmacy").await;
        assert_eq!(intent.category, DEFAULT_CATEGORY);
        assert_eq!(intent.keywords, vec!["24h pharmacy", "cafe"]);
    }
}
