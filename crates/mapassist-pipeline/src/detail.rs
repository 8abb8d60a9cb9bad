//! Place-detail path: provider lookup plus a generated description.

use mapassist_ai::PlaceDescriber;
use mapassist_core::PlaceDetails;
use mapassist_places::PlaceSource;

#[derive(Debug, Clone)]
pub struct PlaceDetailService {
    source: PlaceSource,
    describer: PlaceDescriber,
}

impl PlaceDetailService {
    #[must_use]
    pub fn new(source: PlaceSource, describer: PlaceDescriber) -> Self {
        Self { source, describer }
    }

    /// Details for `place_id` with a description tuned to `keywords`.
    ///
    /// `None` when the place is unknown or the lookup fails. A failed
    /// description leaves `description` empty.
    pub async fn describe(&self, place_id: &str, keywords: &[String]) -> Option<PlaceDetails> {
        let mut details = self.source.details(place_id).await?;
        details.description = self.describer.describe(&details, keywords).await;
        Some(details)
    }
}
