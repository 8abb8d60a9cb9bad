//! Place source adapter: the fault-tolerant boundary around Geoapify.

use mapassist_core::{AppConfig, Coordinates, InterpretedIntent, PlaceCandidate, PlaceDetails};
use reqwest::Client;

use crate::error::PlacesError;
use crate::geoapify::GeoapifyClient;

/// Fetches nearby candidates for an interpreted intent.
///
/// Never fails: a missing key, a network error, or a malformed payload all
/// produce an empty list, which callers render as "no results".
#[derive(Debug, Clone)]
pub struct PlaceSource {
    client: Option<GeoapifyClient>,
    default_radius_m: u32,
    limit: u32,
}

impl PlaceSource {
    #[must_use]
    pub fn new(client: Option<GeoapifyClient>, default_radius_m: u32, limit: u32) -> Self {
        Self {
            client,
            default_radius_m,
            limit,
        }
    }

    /// Builds the source from configuration, sharing `http` with other
    /// providers. A missing `GEOAPIFY_API_KEY` yields a source that always
    /// returns nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::InvalidBaseUrl`] if the configured endpoint
    /// does not parse.
    pub fn from_config(config: &AppConfig, http: &Client) -> Result<Self, PlacesError> {
        let client = config
            .geoapify_api_key
            .as_deref()
            .map(|key| GeoapifyClient::with_client(http.clone(), key, &config.endpoints.geoapify))
            .transpose()?;
        Ok(Self::new(
            client,
            config.search_radius_m,
            config.search_limit,
        ))
    }

    #[must_use]
    pub fn default_radius_m(&self) -> u32 {
        self.default_radius_m
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Candidates of the intent's category around `origin`, nearest first.
    pub async fn search(
        &self,
        origin: Coordinates,
        intent: &InterpretedIntent,
        radius_m: u32,
    ) -> Vec<PlaceCandidate> {
        let Some(client) = &self.client else {
            tracing::debug!(source = "geoapify", "place provider not configured");
            return Vec::new();
        };

        match client
            .search_places(origin, intent.category, radius_m.max(1), self.limit)
            .await
        {
            Ok(candidates) => {
                tracing::debug!(
                    source = "geoapify",
                    category = %intent.category,
                    radius_m,
                    count = candidates.len(),
                    "place search complete"
                );
                candidates
            }
            Err(e) => {
                tracing::warn!(
                    source = "geoapify",
                    category = %intent.category,
                    error = %e,
                    "place search failed"
                );
                Vec::new()
            }
        }
    }

    /// Single-place lookup for the detail screen. `None` when the place is
    /// unknown or the lookup fails.
    pub async fn details(&self, place_id: &str) -> Option<PlaceDetails> {
        let client = self.client.as_ref()?;
        match client.place_details(place_id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(
                    source = "geoapify",
                    place_id,
                    error = %e,
                    "place details lookup failed"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mapassist_core::PlaceCategory;

    use super::*;

    #[tokio::test]
    async fn unconfigured_source_returns_nothing() {
        let source = PlaceSource::new(None, 2500, 20);
        let intent = InterpretedIntent {
            category: PlaceCategory::Cafe,
            keywords: vec!["wifi".to_string(), "quiet".to_string()],
        };

        assert!(!source.is_configured());
        assert!(source
            .search(Coordinates::new(49.84, 24.03), &intent, 2500)
            .await
            .is_empty());
        assert!(source.details("abc").await.is_none());
    }
}
