//! HTTP client for the Geoapify Places and Place Details APIs.

use mapassist_core::{Coordinates, PlaceCandidate, PlaceCategory, PlaceDetails};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::error::PlacesError;
use crate::http::{build_client, endpoint, send_json};
use crate::normalize::{normalize_candidate, normalize_details};

const DEFAULT_BASE_URL: &str = "https://api.geoapify.com";

/// Client for Geoapify place search and place details.
///
/// Use [`GeoapifyClient::new`] for production or
/// [`GeoapifyClient::with_base_url`] to point at a mock server in tests.
#[derive(Clone)]
pub struct GeoapifyClient {
    client: Client,
    api_key: String,
    places_url: Url,
    details_url: Url,
}

impl std::fmt::Debug for GeoapifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoapifyClient")
            .field("places_url", &self.places_url.as_str())
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Value,
}

impl GeoapifyClient {
    /// Creates a client pointed at the production Geoapify API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        Self::with_client(build_client(timeout_secs)?, api_key, base_url)
    }

    /// Creates a client that shares an existing connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_client(client: Client, api_key: &str, base_url: &str) -> Result<Self, PlacesError> {
        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            places_url: endpoint(base_url, "v2/places")?,
            details_url: endpoint(base_url, "v2/place-details")?,
        })
    }

    /// Searches places of `category` within `radius_m` of `origin`, nearest
    /// first.
    ///
    /// Records without an id or a valid position are skipped.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure.
    /// - [`PlacesError::UnexpectedStatus`] on a non-2xx status.
    /// - [`PlacesError::Deserialize`] if the body is not a feature collection.
    pub async fn search_places(
        &self,
        origin: Coordinates,
        category: PlaceCategory,
        radius_m: u32,
        limit: u32,
    ) -> Result<Vec<PlaceCandidate>, PlacesError> {
        let url = self.search_url(origin, category, radius_m, limit);
        let collection: FeatureCollection = send_json(
            self.client.get(url),
            &format!("geoapify places(categories={category})"),
        )
        .await?;

        let total = collection.features.len();
        let candidates: Vec<PlaceCandidate> = collection
            .features
            .into_iter()
            .filter_map(|feature| normalize_candidate(feature.properties, category))
            .collect();

        if candidates.len() < total {
            tracing::debug!(
                source = "geoapify",
                skipped = total - candidates.len(),
                "dropped place records without id or position"
            );
        }

        Ok(candidates)
    }

    /// Looks up one place by its Geoapify id.
    ///
    /// Returns `Ok(None)` when the provider knows no such place.
    ///
    /// # Errors
    ///
    /// Same as [`GeoapifyClient::search_places`].
    pub async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, PlacesError> {
        let mut url = self.details_url.clone();
        url.query_pairs_mut()
            .append_pair("id", place_id)
            .append_pair("apiKey", &self.api_key);

        let collection: FeatureCollection = send_json(
            self.client.get(url),
            &format!("geoapify place-details(id={place_id})"),
        )
        .await?;

        Ok(collection
            .features
            .into_iter()
            .find(|feature| feature.properties.is_object())
            .map(|feature| normalize_details(place_id, &feature.properties)))
    }

    fn search_url(
        &self,
        origin: Coordinates,
        category: PlaceCategory,
        radius_m: u32,
        limit: u32,
    ) -> Url {
        let mut url = self.places_url.clone();
        url.query_pairs_mut()
            .append_pair("categories", category.as_str())
            .append_pair(
                "filter",
                &format!(
                    "circle:{},{},{radius_m}",
                    origin.longitude, origin.latitude
                ),
            )
            .append_pair(
                "bias",
                &format!("proximity:{},{}", origin.longitude, origin.latitude),
            )
            .append_pair("limit", &limit.to_string())
            .append_pair("apiKey", &self.api_key);
        url
    }
}
