//! Wikidata `P18` (image) lookup, rendered as a Wikimedia Commons file URL.

use reqwest::Client;
use serde_json::Value;

use crate::error::PlacesError;
use crate::http::{encode_component, endpoint, send_json};

const COMMONS_FILE_PATH: &str = "https://commons.wikimedia.org/wiki/Special:FilePath/";

#[derive(Debug, Clone)]
pub struct WikidataSource {
    client: Client,
    base_url: String,
}

impl WikidataSource {
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Commons URL of the entity's main image, `None` when it has none.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] on network failure, a non-2xx status, or a
    /// body that is not JSON.
    pub async fn entity_image(&self, entity_id: &str) -> Result<Option<String>, PlacesError> {
        let url = endpoint(
            &self.base_url,
            &format!("wiki/Special:EntityData/{entity_id}.json"),
        )?;
        let body: Value = send_json(
            self.client.get(url),
            &format!("wikidata entity {entity_id}"),
        )
        .await?;

        Ok(p18_file_name(&body, entity_id).map(|file| commons_file_url(&file)))
    }
}

/// First `P18` claim value. Redirected entities come back under their new
/// id, so any single entity in the payload is accepted.
fn p18_file_name(body: &Value, entity_id: &str) -> Option<String> {
    let entities = body.get("entities")?.as_object()?;
    let entity = entities
        .get(entity_id)
        .or_else(|| entities.values().next())?;

    entity
        .pointer("/claims/P18/0/mainsnak/datavalue/value")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|file| !file.is_empty())
        .map(str::to_string)
}

fn commons_file_url(file_name: &str) -> String {
    format!("{COMMONS_FILE_PATH}{}", encode_component(file_name))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_first_p18_claim() {
        let body = json!({
            "entities": {
                "Q1": { "claims": { "P18": [
                    { "mainsnak": { "datavalue": { "value": "Lviv Opera House.jpg" } } },
                    { "mainsnak": { "datavalue": { "value": "Other.jpg" } } }
                ] } }
            }
        });
        assert_eq!(p18_file_name(&body, "Q1").as_deref(), Some("Lviv Opera House.jpg"));
    }

    #[test]
    fn follows_redirected_entity() {
        let body = json!({
            "entities": { "Q2": { "claims": { "P18": [
                { "mainsnak": { "datavalue": { "value": "Redirect.png" } } }
            ] } } }
        });
        assert_eq!(p18_file_name(&body, "Q1").as_deref(), Some("Redirect.png"));
    }

    #[test]
    fn entity_without_image_is_none() {
        let body = json!({ "entities": { "Q1": { "claims": { "P31": [] } } } });
        assert!(p18_file_name(&body, "Q1").is_none());
        assert!(p18_file_name(&json!({}), "Q1").is_none());
    }

    #[test]
    fn commons_url_is_encoded() {
        assert_eq!(
            commons_file_url("Lviv Opera House.jpg"),
            "https://commons.wikimedia.org/wiki/Special:FilePath/Lviv%20Opera%20House.jpg"
        );
    }
}
