//! Relevance ranker: asks the model for an index permutation and applies it.

use mapassist_core::PlaceCandidate;
use serde_json::Value;

use crate::client::GeminiClient;
use crate::extract::{extract, Extracted, Shape};

/// Reorders candidates by relevance to the interpreted keywords.
///
/// The model only ever returns positions; candidates themselves never pass
/// through it. Any failure returns the input order untouched.
#[derive(Debug, Clone)]
pub struct RelevanceRanker {
    client: Option<GeminiClient>,
}

impl RelevanceRanker {
    #[must_use]
    pub fn new(client: Option<GeminiClient>) -> Self {
        Self { client }
    }

    /// Rank `candidates` against `keywords`.
    ///
    /// With no keywords or no candidates the input is returned as-is and no
    /// call is made.
    pub async fn rank(
        &self,
        candidates: Vec<PlaceCandidate>,
        keywords: &[String],
    ) -> Vec<PlaceCandidate> {
        if candidates.is_empty() || keywords.is_empty() {
            return candidates;
        }
        let Some(client) = &self.client else {
            tracing::debug!("generative model unavailable, keeping provider order");
            return candidates;
        };

        let text = match client.generate(&build_prompt(&candidates, keywords)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    stage = "rank",
                    model = client.model(),
                    error = %e,
                    "ranking call failed, keeping provider order"
                );
                return candidates;
            }
        };

        match extract::<Vec<Value>>(&text, Shape::Array) {
            Extracted::Parsed(order) => apply_order(candidates, &order),
            Extracted::Unparsed(e) => {
                tracing::warn!(stage = "rank", error = %e, "model answer is not a JSON array");
                candidates
            }
        }
    }
}

/// Apply a 1-based position list to `candidates`.
///
/// Positions that are out of range, non-numeric, or repeated are skipped.
/// Positions the model left out are dropped from the result. If nothing
/// valid remains, the original order is returned.
#[must_use]
pub fn apply_order(candidates: Vec<PlaceCandidate>, order: &[Value]) -> Vec<PlaceCandidate> {
    let mut slots: Vec<Option<PlaceCandidate>> = candidates.into_iter().map(Some).collect();
    let mut ranked = Vec::with_capacity(slots.len());

    for position in order.iter().filter_map(as_position) {
        if let Some(slot) = position.checked_sub(1).and_then(|i| slots.get_mut(i)) {
            if let Some(candidate) = slot.take() {
                ranked.push(candidate);
            }
        }
    }

    if ranked.is_empty() {
        // Nothing was taken, so every slot is still filled.
        return slots.into_iter().flatten().collect();
    }

    ranked
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn as_position(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().map(|u| u as usize).or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 1.0)
                .map(|f| f as usize)
        }),
        Value::String(s) => s.trim().trim_start_matches('#').parse::<usize>().ok(),
        _ => None,
    }
}

fn build_prompt(candidates: &[PlaceCandidate], keywords: &[String]) -> String {
    let places = candidates
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let description = if p.description.is_empty() {
                "-"
            } else {
                p.description.as_str()
            };
            format!(
                "{}. Name: {}; Category: {}; Description: {}",
                i + 1,
                p.name,
                p.category,
                description
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You sort places by how well they match the user's keywords.

User keywords:
{keywords}

Places:
{places}

Return ONLY a JSON array of place numbers, most relevant first, for example:
[3, 1, 2]

No explanations, no text, no formatting.",
        keywords = keywords.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use mapassist_core::Coordinates;
    use serde_json::json;

    use super::*;

    fn place(id: &str) -> PlaceCandidate {
        PlaceCandidate {
            id: id.to_string(),
            name: format!("Place {id}"),
            category: "catering.cafe".to_string(),
            coordinates: Coordinates::new(49.84, 24.03),
            open_now: true,
            address: String::new(),
            city: None,
            rating: 4.3,
            distance_m: None,
            raw: Value::Null,
            photo_url: String::new(),
            description: String::new(),
            phone: String::new(),
            working_hours: Vec::new(),
        }
    }

    fn ids(places: &[PlaceCandidate]) -> Vec<&str> {
        places.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn applies_full_permutation() {
        let got = apply_order(
            vec![place("a"), place("b"), place("c")],
            &[json!(3), json!(1), json!(2)],
        );
        assert_eq!(ids(&got), vec!["c", "a", "b"]);
    }

    #[test]
    fn out_of_range_positions_are_dropped() {
        let got = apply_order(vec![place("a"), place("b")], &[json!(1), json!(99), json!(2)]);
        assert_eq!(ids(&got), vec!["a", "b"]);
    }

    #[test]
    fn zero_and_negative_positions_are_dropped() {
        let got = apply_order(vec![place("a"), place("b")], &[json!(0), json!(-1), json!(2)]);
        assert_eq!(ids(&got), vec!["b"]);
    }

    #[test]
    fn subset_keeps_only_named_positions() {
        let got = apply_order(vec![place("a"), place("b"), place("c")], &[json!(2)]);
        assert_eq!(ids(&got), vec!["b"]);
    }

    #[test]
    fn repeated_positions_do_not_duplicate() {
        let got = apply_order(
            vec![place("a"), place("b")],
            &[json!(2), json!(2), json!(1), json!(1)],
        );
        assert_eq!(ids(&got), vec!["b", "a"]);
    }

    #[test]
    fn numeric_strings_and_floats_are_accepted() {
        let got = apply_order(
            vec![place("a"), place("b"), place("c")],
            &[json!("3"), json!(1.0), json!("#2")],
        );
        assert_eq!(ids(&got), vec!["c", "a", "b"]);
    }

    #[test]
    fn nothing_valid_returns_original_order() {
        let got = apply_order(
            vec![place("a"), place("b")],
            &[json!(7), json!("x"), json!(null)],
        );
        assert_eq!(ids(&got), vec!["a", "b"]);
    }

    #[test]
    fn empty_order_returns_original_order() {
        let got = apply_order(vec![place("a"), place("b")], &[]);
        assert_eq!(ids(&got), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn empty_keywords_is_identity_without_client() {
        let ranker = RelevanceRanker::new(None);
        let got = ranker.rank(vec![place("b"), place("a")], &[]).await;
        assert_eq!(ids(&got), vec!["b", "a"]);
    }

    #[tokio::test]
    async fn missing_client_keeps_order() {
        let ranker = RelevanceRanker::new(None);
        let got = ranker
            .rank(vec![place("b"), place("a")], &["wifi".to_string()])
            .await;
        assert_eq!(ids(&got), vec!["b", "a"]);
    }

    #[test]
    fn prompt_numbers_places_from_one() {
        let mut second = place("b");
        second.description = "quiet courtyard".to_string();
        let prompt = build_prompt(&[place("a"), second], &["quiet".to_string(), "wifi".to_string()]);
        assert!(prompt.contains("1. Name: Place a; Category: catering.cafe; Description: -"));
        assert!(prompt.contains("2. Name: Place b; Category: catering.cafe; Description: quiet courtyard"));
        assert!(prompt.contains("quiet, wifi"));
    }
}
