//! Short prose description for the place-detail screen.

use mapassist_core::PlaceDetails;

use crate::client::GeminiClient;

#[derive(Debug, Clone)]
pub struct PlaceDescriber {
    client: Option<GeminiClient>,
}

impl PlaceDescriber {
    #[must_use]
    pub fn new(client: Option<GeminiClient>) -> Self {
        Self { client }
    }

    /// Write a 3-6 sentence description of `place` tuned to `keywords`.
    ///
    /// Returns an empty string when the model is unavailable or the call fails.
    pub async fn describe(&self, place: &PlaceDetails, keywords: &[String]) -> String {
        let Some(client) = &self.client else {
            return String::new();
        };

        match client.generate(&build_prompt(place, keywords)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    stage = "describe",
                    place_id = %place.place_id,
                    error = %e,
                    "place description call failed"
                );
                String::new()
            }
        }
    }
}

fn build_prompt(place: &PlaceDetails, keywords: &[String]) -> String {
    let rating = if place.rating > 0.0 {
        format!("{:.1}", place.rating)
    } else {
        "no rating".to_string()
    };
    let wishes = if keywords.is_empty() {
        "-".to_string()
    } else {
        keywords.join(", ")
    };
    let hours = place.opening_hours.as_deref().unwrap_or("-");

    format!(
        "Write a unique, well-written description of this place.
Describe the atmosphere, the impression it makes, who it suits, and why it may fit the user.

Data:
Name: {name}
Address: {address}
Rating: {rating}
Opening hours: {hours}
User wishes: {wishes}

Requirements:
- Friendly, lively, professional tone.
- 3 to 6 sentences.
- No lists, bullets, or numbering.
- Do not restate the raw data (no \"rating 4.7\", no street address).
- Write in the language of the user wishes when they are not English.",
        name = place.name,
        address = place.address,
    )
}
