//! Web image search, raced across engines.
//!
//! Google and Bing result pages are scraped for image URLs; SerpAPI's Google
//! Maps engine joins the race only when a key is configured. The first engine
//! with a usable URL wins; ties go to Google, then Bing, then SerpAPI.

use std::sync::LazyLock;

use futures::FutureExt;
use mapassist_core::category::category_leaf;
use mapassist_core::defaults::IMAGE_SEARCH_MAX_RESULTS;
use mapassist_core::PlaceCandidate;
use regex::Regex;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde_json::Value;

use crate::http::{endpoint, send_json, send_text};
use crate::photos::embedded::is_http_url;
use crate::photos::settle;
use crate::race::{first_non_empty, Contender};

static IMG_SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src="(https://[^"]+?)""#).expect("valid img src regex"));
static MURL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"murl(?:&quot;|"):(?:&quot;|")(https?://.+?)(?:&quot;|")"#)
        .expect("valid murl regex")
});

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml";

/// JSON pointers tried, in order, on a SerpAPI Google Maps response.
const SERPAPI_PHOTO_POINTERS: [&str; 5] = [
    "/place_results/thumbnail",
    "/local_results/0/thumbnail",
    "/photos/0/photo_url",
    "/images_results/0/original",
    "/images_results/0/thumbnail",
];

#[derive(Clone)]
struct SerpApi {
    base_url: String,
    api_key: String,
}

#[derive(Clone)]
pub struct ImageSearch {
    client: Client,
    user_agent: String,
    google_base: String,
    bing_base: String,
    serpapi: Option<SerpApi>,
}

impl std::fmt::Debug for ImageSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSearch")
            .field("google_base", &self.google_base)
            .field("bing_base", &self.bing_base)
            .field("serpapi", &self.serpapi.as_ref().map(|s| s.base_url.as_str()))
            .finish_non_exhaustive()
    }
}

impl ImageSearch {
    #[must_use]
    pub fn new(client: Client, user_agent: &str, google_base: &str, bing_base: &str) -> Self {
        Self {
            client,
            user_agent: user_agent.to_string(),
            google_base: google_base.to_string(),
            bing_base: bing_base.to_string(),
            serpapi: None,
        }
    }

    /// Adds the SerpAPI engine as the lowest-precedence contender.
    #[must_use]
    pub fn with_serpapi(mut self, base_url: &str, api_key: &str) -> Self {
        self.serpapi = Some(SerpApi {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        });
        self
    }

    /// First usable image URL any engine finds for `place`.
    pub async fn race(&self, place: &PlaceCandidate) -> Option<String> {
        let terms = search_terms(place);
        if terms.is_empty() {
            return None;
        }
        first_non_empty(self.contenders(place, &terms)).await
    }

    fn contenders(&self, place: &PlaceCandidate, terms: &str) -> Vec<Contender> {
        let mut contenders: Vec<Contender> = Vec::with_capacity(3);

        match endpoint(&self.google_base, "search") {
            Ok(mut url) => {
                url.query_pairs_mut()
                    .append_pair("tbm", "isch")
                    .append_pair("q", terms);
                let request = self.scrape_request(url);
                let place_id = place.id.clone();
                contenders.push(
                    async move {
                        let found = send_text(request, "google images")
                            .await
                            .map(|html| google_thumbnails(&html).into_iter().next());
                        settle("google_images", &place_id, found).unwrap_or_default()
                    }
                    .boxed(),
                );
            }
            Err(e) => tracing::warn!(source = "google_images", error = %e, "engine skipped"),
        }

        match endpoint(&self.bing_base, "images/search") {
            Ok(mut url) => {
                url.query_pairs_mut()
                    .append_pair("q", terms)
                    .append_pair("form", "HDRSC2")
                    .append_pair("first", "1");
                let request = self.scrape_request(url);
                let place_id = place.id.clone();
                contenders.push(
                    async move {
                        let found = send_text(request, "bing images")
                            .await
                            .map(|html| bing_media_urls(&html).into_iter().next());
                        settle("bing_images", &place_id, found).unwrap_or_default()
                    }
                    .boxed(),
                );
            }
            Err(e) => tracing::warn!(source = "bing_images", error = %e, "engine skipped"),
        }

        if let Some(serpapi) = &self.serpapi {
            match endpoint(&serpapi.base_url, "search.json") {
                Ok(mut url) => {
                    url.query_pairs_mut()
                        .append_pair("engine", "google_maps")
                        .append_pair("type", "search")
                        .append_pair("q", terms)
                        .append_pair(
                            "ll",
                            &format!(
                                "@{},{},14z",
                                place.coordinates.latitude, place.coordinates.longitude
                            ),
                        )
                        .append_pair("api_key", &serpapi.api_key);
                    let request = self.client.get(url);
                    let place_id = place.id.clone();
                    contenders.push(
                        async move {
                            let found = send_json::<Value>(request, "serpapi google_maps")
                                .await
                                .map(|body| serpapi_photo(&body));
                            settle("serpapi", &place_id, found).unwrap_or_default()
                        }
                        .boxed(),
                    );
                }
                Err(e) => tracing::warn!(source = "serpapi", error = %e, "engine skipped"),
            }
        }

        contenders
    }

    fn scrape_request(&self, url: reqwest::Url) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, HTML_ACCEPT)
    }
}

/// Name, city and category leaf, space-separated, blanks skipped.
#[must_use]
pub fn search_terms(place: &PlaceCandidate) -> String {
    [
        place.name.trim(),
        place.city.as_deref().unwrap_or_default().trim(),
        category_leaf(&place.category),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

/// `gstatic` thumbnail URLs from a Google Images result page.
#[must_use]
pub fn google_thumbnails(html: &str) -> Vec<String> {
    IMG_SRC_RE
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|url| url.contains("gstatic"))
        .take(IMAGE_SEARCH_MAX_RESULTS)
        .map(str::to_string)
        .collect()
}

/// Full-size media URLs from the `murl` metadata on a Bing Images page.
#[must_use]
pub fn bing_media_urls(html: &str) -> Vec<String> {
    MURL_RE
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().replace("&amp;", "&"))
        .take(IMAGE_SEARCH_MAX_RESULTS)
        .collect()
}

fn serpapi_photo(body: &Value) -> Option<String> {
    SERPAPI_PHOTO_POINTERS
        .iter()
        .filter_map(|pointer| body.pointer(pointer).and_then(Value::as_str))
        .map(str::trim)
        .find(|url| is_http_url(url))
        .map(str::to_string)
}
