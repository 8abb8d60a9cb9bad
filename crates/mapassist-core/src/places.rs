//! Place records flowing through the search pipeline.

use serde::{Deserialize, Serialize};

use crate::intent::InterpretedIntent;

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `true` when both components are finite and inside their ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// One free-text search issued from a known position.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub origin: Coordinates,
}

/// One place returned by the place provider, enriched in place by the photo
/// cascade and reordered by the ranker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Provider place id.
    pub id: String,
    pub name: String,
    /// Provider category path, e.g. `catering.cafe`.
    pub category: String,
    pub coordinates: Coordinates,
    pub open_now: bool,
    pub address: String,
    /// City or locality, used to disambiguate image searches.
    #[serde(default)]
    pub city: Option<String>,
    pub rating: f64,
    /// Distance from the search origin reported by the provider, in meters.
    #[serde(default)]
    pub distance_m: Option<f64>,
    /// Provider payload, only read by the photo cascade.
    #[serde(default)]
    pub raw: serde_json::Value,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub working_hours: Vec<String>,
}

impl PlaceCandidate {
    /// Merge business-directory fields, filling only what is still empty.
    pub fn merge_directory_details(&mut self, details: &DirectoryDetails) {
        if self.phone.is_empty() {
            if let Some(phone) = details.phone.as_deref().filter(|p| !p.is_empty()) {
                self.phone = phone.to_string();
            }
        }
        if self.description.is_empty() {
            if let Some(description) = details.description.as_deref().filter(|d| !d.is_empty()) {
                self.description = description.to_string();
            }
        }
        if self.working_hours.is_empty() && !details.working_hours.is_empty() {
            self.working_hours.clone_from(&details.working_hours);
        }
    }
}

/// Ancillary fields returned alongside a business-directory photo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryDetails {
    pub phone: Option<String>,
    pub description: Option<String>,
    pub working_hours: Vec<String>,
}

impl DirectoryDetails {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phone.as_deref().is_none_or(str::is_empty)
            && self.description.as_deref().is_none_or(str::is_empty)
            && self.working_hours.is_empty()
    }
}

/// Candidates in relevance order, most relevant first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedResultSet(Vec<PlaceCandidate>);

impl RankedResultSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PlaceCandidate] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<PlaceCandidate> {
        self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlaceCandidate> {
        self.0.iter()
    }
}

impl From<Vec<PlaceCandidate>> for RankedResultSet {
    fn from(places: Vec<PlaceCandidate>) -> Self {
        Self(places)
    }
}

impl<'a> IntoIterator for &'a RankedResultSet {
    type Item = &'a PlaceCandidate;
    type IntoIter = std::slice::Iter<'a, PlaceCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// What a completed search hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub intent: InterpretedIntent,
    pub places: RankedResultSet,
}

/// Single-place view for the detail screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: Option<String>,
    pub opening_hours: Option<String>,
    pub rating: f64,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> PlaceCandidate {
        PlaceCandidate {
            id: "p1".to_string(),
            name: "Kavarnia".to_string(),
            category: "catering.cafe".to_string(),
            coordinates: Coordinates::new(49.84, 24.03),
            open_now: false,
            address: String::new(),
            city: None,
            rating: 4.3,
            distance_m: None,
            raw: serde_json::Value::Null,
            photo_url: String::new(),
            description: String::new(),
            phone: "+380 32 000 0000".to_string(),
            working_hours: Vec::new(),
        }
    }

    #[test]
    fn coordinates_validation() {
        assert!(Coordinates::new(49.84, 24.03).is_valid());
        assert!(Coordinates::new(-90.0, 180.0).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -180.5).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn merge_fills_only_empty_fields() {
        let mut place = candidate();
        place.merge_directory_details(&DirectoryDetails {
            phone: Some("+1 555 0100".to_string()),
            description: Some("Coffee & Tea".to_string()),
            working_hours: vec!["Mon 08:00-20:00".to_string()],
        });
        assert_eq!(place.phone, "+380 32 000 0000");
        assert_eq!(place.description, "Coffee & Tea");
        assert_eq!(place.working_hours, vec!["Mon 08:00-20:00"]);
    }

    #[test]
    fn directory_details_emptiness() {
        assert!(DirectoryDetails::default().is_empty());
        assert!(DirectoryDetails {
            phone: Some(String::new()),
            ..DirectoryDetails::default()
        }
        .is_empty());
        assert!(!DirectoryDetails {
            description: Some("Bakery".to_string()),
            ..DirectoryDetails::default()
        }
        .is_empty());
    }

    #[test]
    fn candidate_deserializes_without_enrichment_fields() {
        let json = serde_json::json!({
            "id": "p9",
            "name": "Park",
            "category": "leisure.park",
            "coordinates": { "latitude": 49.8, "longitude": 24.0 },
            "open_now": true,
            "address": "Stryiska St",
            "rating": 4.8
        });
        let place: PlaceCandidate = serde_json::from_value(json).expect("deserialize");
        assert!(place.photo_url.is_empty());
        assert!(place.raw.is_null());
        assert!(place.working_hours.is_empty());
    }

    #[test]
    fn ranked_result_set_serializes_as_plain_array() {
        let set = RankedResultSet::from(vec![candidate()]);
        let json = serde_json::to_value(&set).expect("serialize");
        assert!(json.is_array());
        assert_eq!(json[0]["id"], "p1");
    }
}
