//! Photo resolver: a fixed-order cascade over five photo sources.
//!
//! 1. image embedded in the Geoapify payload
//! 2. Wikidata `P18` image of the linked entity
//! 3. business directories (Yelp, then Foursquare), which also supply
//!    phone, hours and a short description
//! 4. web image search, raced across engines
//! 5. Pexels stock photo for the category
//!
//! The first non-empty URL wins. A failing source is logged and skipped;
//! the resolver itself never fails.

pub mod directory;
pub mod embedded;
pub mod image_search;
pub mod stock;
pub mod wikidata;

use mapassist_core::{AppConfig, DirectoryDetails, PlaceCandidate};
use reqwest::Client;

use crate::error::PlacesError;
use directory::{absorb, DirectoryHit, FoursquareSource, YelpSource};
use embedded::{embedded_photo, wikidata_id};
use image_search::ImageSearch;
use stock::{stock_query, PexelsSource};
use wikidata::WikidataSource;

/// Outcome of one cascade run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoResolution {
    /// Winning URL, empty when every source came back empty.
    pub url: String,
    /// Directory fields gathered on the way, if the cascade reached step 3.
    pub details: DirectoryDetails,
}

#[derive(Debug, Clone)]
pub struct PhotoResolver {
    wikidata: WikidataSource,
    yelp: Option<YelpSource>,
    foursquare: Option<FoursquareSource>,
    image_search: ImageSearch,
    pexels: Option<PexelsSource>,
}

impl PhotoResolver {
    /// Builds every source from configuration, sharing `http`.
    ///
    /// Keyed sources whose key is missing are left out for the life of the
    /// resolver; Wikidata and the scraped engines need no key.
    #[must_use]
    pub fn from_config(config: &AppConfig, http: &Client) -> Self {
        let endpoints = &config.endpoints;

        let mut image_search = ImageSearch::new(
            http.clone(),
            &config.scraper_user_agent,
            &endpoints.google_images,
            &endpoints.bing_images,
        );
        if let Some(key) = &config.serpapi_api_key {
            image_search = image_search.with_serpapi(&endpoints.serpapi, key);
        }

        Self {
            wikidata: WikidataSource::new(http.clone(), &endpoints.wikidata),
            yelp: config
                .yelp_api_key
                .as_deref()
                .map(|key| YelpSource::new(http.clone(), &endpoints.yelp, key)),
            foursquare: config
                .foursquare_api_key
                .as_deref()
                .map(|key| FoursquareSource::new(http.clone(), &endpoints.foursquare, key)),
            image_search,
            pexels: config
                .pexels_api_key
                .as_deref()
                .map(|key| PexelsSource::new(http.clone(), &endpoints.pexels, key)),
        }
    }

    /// Runs the cascade for one candidate without modifying it.
    pub async fn resolve_photo(&self, place: &PlaceCandidate) -> PhotoResolution {
        let mut resolution = PhotoResolution::default();
        let place_id = place.id.as_str();

        if let Some(url) = embedded_photo(&place.raw) {
            return resolved("embedded", place_id, resolution, url);
        }

        if let Some(entity_id) = wikidata_id(&place.raw) {
            let found = self.wikidata.entity_image(entity_id).await;
            if let Some(url) = settle("wikidata", place_id, found) {
                return resolved("wikidata", place_id, resolution, url);
            }
        }

        if let Some(yelp) = &self.yelp {
            let found = yelp.lookup(place).await;
            if let Some(url) = collect_directory("yelp", place_id, found, &mut resolution.details) {
                return resolved("yelp", place_id, resolution, url);
            }
        }

        if let Some(foursquare) = &self.foursquare {
            let found = foursquare.lookup(place).await;
            if let Some(url) =
                collect_directory("foursquare", place_id, found, &mut resolution.details)
            {
                return resolved("foursquare", place_id, resolution, url);
            }
        }

        if let Some(url) = self.image_search.race(place).await {
            return resolved("image_search", place_id, resolution, url);
        }

        if let Some(pexels) = &self.pexels {
            let found = pexels.photo_for(stock_query(&place.category)).await;
            if let Some(url) = settle("pexels", place_id, found) {
                return resolved("pexels", place_id, resolution, url);
            }
        }

        tracing::debug!(place_id, "no photo source produced a URL");
        resolution
    }

    /// Fills `photo_url` and any empty directory fields on `place`.
    ///
    /// A candidate that already has a photo is left untouched, so repeated
    /// calls make no further requests.
    pub async fn enrich(&self, place: &mut PlaceCandidate) {
        if !place.photo_url.trim().is_empty() {
            return;
        }
        let resolution = self.resolve_photo(place).await;
        place.photo_url = resolution.url;
        place.merge_directory_details(&resolution.details);
    }
}

/// Unwraps one source result, logging and discarding failures and blanks.
pub(crate) fn settle(
    source: &'static str,
    place_id: &str,
    result: Result<Option<String>, PlacesError>,
) -> Option<String> {
    match result {
        Ok(found) => {
            let found = found.filter(|url| !url.trim().is_empty());
            if found.is_none() {
                tracing::debug!(source, place_id, "photo source had nothing");
            }
            found
        }
        Err(e) => {
            tracing::warn!(source, place_id, error = %e, "photo source failed");
            None
        }
    }
}

fn collect_directory(
    source: &'static str,
    place_id: &str,
    result: Result<Option<DirectoryHit>, PlacesError>,
    details: &mut DirectoryDetails,
) -> Option<String> {
    let hit = match result {
        Ok(hit) => hit,
        Err(e) => return settle(source, place_id, Err(e)),
    }?;
    absorb(details, hit.details);
    settle(source, place_id, Ok(hit.photo_url))
}

fn resolved(
    source: &'static str,
    place_id: &str,
    mut resolution: PhotoResolution,
    url: String,
) -> PhotoResolution {
    tracing::debug!(source, place_id, "photo resolved");
    resolution.url = url;
    resolution
}

#[cfg(test)]
mod tests {
    use mapassist_core::{Coordinates, Environment, ProviderEndpoints};
    use serde_json::json;

    use super::*;

    fn offline_config() -> AppConfig {
        AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().expect("valid addr"),
            log_level: "debug".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-2.0-flash".to_string(),
            geoapify_api_key: None,
            yelp_api_key: None,
            foursquare_api_key: None,
            pexels_api_key: None,
            serpapi_api_key: None,
            search_radius_m: 2500,
            search_limit: 20,
            request_timeout_secs: 1,
            scraper_user_agent: "test-agent".to_string(),
            // Port 9 (discard) refuses connections, so any request fails fast.
            endpoints: ProviderEndpoints::all("http://127.0.0.1:9"),
        }
    }

    fn place_with_raw(raw: serde_json::Value) -> PlaceCandidate {
        PlaceCandidate {
            id: "p1".to_string(),
            name: "Rynok Square".to_string(),
            category: "tourism.sights".to_string(),
            coordinates: Coordinates::new(49.8419, 24.0316),
            open_now: true,
            address: String::new(),
            city: Some("Lviv".to_string()),
            rating: 4.3,
            distance_m: None,
            raw,
            photo_url: String::new(),
            description: String::new(),
            phone: String::new(),
            working_hours: Vec::new(),
        }
    }

    fn resolver() -> PhotoResolver {
        let http = Client::new();
        PhotoResolver::from_config(&offline_config(), &http)
    }

    #[tokio::test]
    async fn embedded_photo_short_circuits() {
        let place = place_with_raw(json!({ "image": "https://img.example/rynok.jpg" }));
        let resolution = resolver().resolve_photo(&place).await;
        assert_eq!(resolution.url, "https://img.example/rynok.jpg");
        assert_eq!(resolution.details, DirectoryDetails::default());
    }

    #[tokio::test]
    async fn unreachable_sources_degrade_to_empty() {
        let place = place_with_raw(json!({ "datasource": { "raw": { "wikidata": "Q1" } } }));
        let resolution = resolver().resolve_photo(&place).await;
        assert!(resolution.url.is_empty());
    }

    #[tokio::test]
    async fn enrich_keeps_existing_photo() {
        let mut place = place_with_raw(json!({ "image": "https://img.example/new.jpg" }));
        place.photo_url = "https://img.example/old.jpg".to_string();
        resolver().enrich(&mut place).await;
        assert_eq!(place.photo_url, "https://img.example/old.jpg");
    }

    #[test]
    fn settle_drops_blank_and_failed_results() {
        assert_eq!(settle("t", "p", Ok(Some("  ".to_string()))), None);
        assert_eq!(settle("t", "p", Ok(None)), None);
        assert_eq!(
            settle(
                "t",
                "p",
                Err(PlacesError::UnexpectedStatus {
                    status: 500,
                    context: "t".to_string()
                })
            ),
            None
        );
        assert_eq!(
            settle("t", "p", Ok(Some("https://x".to_string()))).as_deref(),
            Some("https://x")
        );
    }

    #[test]
    fn collect_directory_merges_details_without_photo() {
        let mut details = DirectoryDetails::default();
        let url = collect_directory(
            "yelp",
            "p",
            Ok(Some(DirectoryHit {
                photo_url: None,
                details: DirectoryDetails {
                    phone: Some("+380".to_string()),
                    ..DirectoryDetails::default()
                },
            })),
            &mut details,
        );
        assert!(url.is_none());
        assert_eq!(details.phone.as_deref(), Some("+380"));
    }
}
