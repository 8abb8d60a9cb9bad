//! Pexels stock-photo search, the last-resort filler keyed by category.

use mapassist_core::category::category_leaf;
use mapassist_core::defaults::STOCK_PHOTO_FALLBACK_QUERY;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;

use crate::error::PlacesError;
use crate::http::{endpoint, send_json};
use crate::photos::embedded::is_http_url;

#[derive(Debug, Deserialize)]
struct PexelsSearch {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    src: PexelsSrc,
}

#[derive(Debug, Deserialize)]
struct PexelsSrc {
    #[serde(default)]
    landscape: Option<String>,
    #[serde(default)]
    medium: Option<String>,
}

#[derive(Clone)]
pub struct PexelsSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for PexelsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PexelsSource")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl PexelsSource {
    #[must_use]
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// First search hit for `query`, landscape crop preferred.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] on network failure, a non-2xx status, or an
    /// unexpected body.
    pub async fn photo_for(&self, query: &str) -> Result<Option<String>, PlacesError> {
        let mut url = endpoint(&self.base_url, "v1/search")?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("per_page", "1")
            .append_pair("page", "1");

        let search: PexelsSearch = send_json(
            self.client.get(url).header(AUTHORIZATION, &self.api_key),
            &format!("pexels search(query={query})"),
        )
        .await?;

        Ok(search.photos.into_iter().next().and_then(|photo| {
            [photo.src.landscape, photo.src.medium]
                .into_iter()
                .flatten()
                .find(|url| is_http_url(url))
        }))
    }
}

/// Stock query for a category: its leaf, or the generic fallback.
#[must_use]
pub fn stock_query(category: &str) -> &str {
    match category_leaf(category) {
        "" => STOCK_PHOTO_FALLBACK_QUERY,
        leaf => leaf,
    }
}
