//! Photo and knowledge-base references already present in the provider
//! payload.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::normalize::str_at;

static WIKIDATA_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Q[1-9]\d*$").expect("valid wikidata id regex"));

/// Image URL carried in the Geoapify record, if any.
#[must_use]
pub fn embedded_photo(raw: &Value) -> Option<String> {
    let first_of_images = raw
        .get("images")
        .and_then(Value::as_array)
        .and_then(|images| images.first())
        .and_then(Value::as_str)
        .map(str::trim);

    [
        str_at(raw, &["image"]),
        str_at(raw, &["datasource", "raw", "image"]),
        first_of_images,
        str_at(raw, &["wiki_and_media", "image"]),
    ]
    .into_iter()
    .flatten()
    .find(|url| is_http_url(url))
    .map(str::to_string)
}

/// Wikidata entity id (`Q…`) linked from the Geoapify record.
#[must_use]
pub fn wikidata_id(raw: &Value) -> Option<&str> {
    [
        &["datasource", "raw", "wikidata"][..],
        &["wiki_and_media", "wikidata"][..],
        &["datasource", "wikidata"][..],
    ]
    .into_iter()
    .filter_map(|path| str_at(raw, path))
    .find(|id| WIKIDATA_ID_RE.is_match(id))
}

pub(crate) fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn top_level_image_wins() {
        let raw = json!({
            "image": "https://img.example/a.jpg",
            "datasource": { "raw": { "image": "https://img.example/b.jpg" } }
        });
        assert_eq!(embedded_photo(&raw).as_deref(), Some("https://img.example/a.jpg"));
    }

    #[test]
    fn datasource_image_then_images_array() {
        let raw = json!({ "datasource": { "raw": { "image": "https://img.example/b.jpg" } } });
        assert_eq!(embedded_photo(&raw).as_deref(), Some("https://img.example/b.jpg"));

        let raw = json!({ "images": ["https://img.example/c.jpg", "https://img.example/d.jpg"] });
        assert_eq!(embedded_photo(&raw).as_deref(), Some("https://img.example/c.jpg"));
    }

    #[test]
    fn wiki_and_media_image_is_last() {
        let raw = json!({ "wiki_and_media": { "image": "https://upload.example/e.jpg" } });
        assert_eq!(embedded_photo(&raw).as_deref(), Some("https://upload.example/e.jpg"));
    }

    #[test]
    fn non_url_or_missing_image_is_none() {
        assert!(embedded_photo(&json!({ "image": "File:Lviv.jpg" })).is_none());
        assert_eq!(
            embedded_photo(&json!({
                "image": "File:Lviv.jpg",
                "wiki_and_media": { "image": "https://upload.example/f.jpg" }
            }))
            .as_deref(),
            Some("https://upload.example/f.jpg")
        );
        assert!(embedded_photo(&json!({ "image": "" })).is_none());
        assert!(embedded_photo(&Value::Null).is_none());
    }

    #[test]
    fn wikidata_id_from_datasource_or_wiki_and_media() {
        let raw = json!({ "datasource": { "raw": { "wikidata": "Q36036" } } });
        assert_eq!(wikidata_id(&raw), Some("Q36036"));

        let raw = json!({ "wiki_and_media": { "wikidata": "Q42" } });
        assert_eq!(wikidata_id(&raw), Some("Q42"));
    }

    #[test]
    fn malformed_wikidata_id_is_ignored() {
        let raw = json!({
            "datasource": { "raw": { "wikidata": "../etc" } },
            "wiki_and_media": { "wikidata": "Q7" }
        });
        assert_eq!(wikidata_id(&raw), Some("Q7"));
        assert_eq!(wikidata_id(&json!({ "datasource": { "raw": { "wikidata": "Q0" } } })), None);
    }
}
