//! Normalization from Geoapify feature properties to [`PlaceCandidate`] and
//! [`PlaceDetails`].
//!
//! Provider records are kept as untyped JSON because the photo cascade reads
//! several optional nested fields from them later. Every missing optional
//! field is filled from [`mapassist_core::defaults`].

use mapassist_core::defaults::{DEFAULT_OPEN_NOW, DEFAULT_PLACE_NAME, DEFAULT_RATING};
use mapassist_core::{Coordinates, PlaceCandidate, PlaceCategory, PlaceDetails};
use serde_json::Value;

/// Non-blank string at a nested object path.
pub(crate) fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |node, key| node.get(key))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn number_at(value: &Value, path: &[&str]) -> Option<f64> {
    match path.iter().try_fold(value, |node, key| node.get(key))? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Converts one feature's `properties` object into a candidate.
///
/// Returns `None` when the record has no place id or no usable position;
/// such records cannot be shown on a map or looked up again.
#[must_use]
pub fn normalize_candidate(properties: Value, requested: PlaceCategory) -> Option<PlaceCandidate> {
    let id = str_at(&properties, &["place_id"])?.to_string();
    let coordinates = Coordinates::new(
        number_at(&properties, &["lat"])?,
        number_at(&properties, &["lon"])?,
    );
    if !coordinates.is_valid() {
        return None;
    }

    let name = str_at(&properties, &["name"])
        .or_else(|| str_at(&properties, &["address_line1"]))
        .unwrap_or(DEFAULT_PLACE_NAME)
        .to_string();
    let address = str_at(&properties, &["formatted"])
        .or_else(|| str_at(&properties, &["address_line2"]))
        .unwrap_or_default()
        .to_string();
    let city = str_at(&properties, &["city"]).map(str::to_string);
    let rating = number_at(&properties, &["rating"])
        .or_else(|| number_at(&properties, &["datasource", "raw", "rating"]))
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(DEFAULT_RATING);
    let open_now = properties
        .get("open_now")
        .and_then(Value::as_bool)
        .unwrap_or(DEFAULT_OPEN_NOW);
    let distance_m = number_at(&properties, &["distance"]);
    let phone = str_at(&properties, &["contact", "phone"])
        .or_else(|| str_at(&properties, &["datasource", "raw", "phone"]))
        .unwrap_or_default()
        .to_string();
    let working_hours = str_at(&properties, &["opening_hours"])
        .map(split_opening_hours)
        .unwrap_or_default();
    let category = most_specific_category(&properties, requested);

    Some(PlaceCandidate {
        id,
        name,
        category,
        coordinates,
        open_now,
        address,
        city,
        rating,
        distance_m,
        raw: properties,
        photo_url: String::new(),
        description: String::new(),
        phone,
        working_hours,
    })
}

/// Converts a place-details `properties` object into [`PlaceDetails`].
///
/// A missing rating is reported as `0.0`, which the description prompt
/// renders as "no rating".
#[must_use]
pub fn normalize_details(place_id: &str, properties: &Value) -> PlaceDetails {
    PlaceDetails {
        place_id: str_at(properties, &["place_id"])
            .unwrap_or(place_id)
            .to_string(),
        name: str_at(properties, &["name"])
            .unwrap_or(DEFAULT_PLACE_NAME)
            .to_string(),
        address: str_at(properties, &["formatted"])
            .unwrap_or_default()
            .to_string(),
        phone: str_at(properties, &["contact", "phone"])
            .unwrap_or_default()
            .to_string(),
        website: str_at(properties, &["website"]).map(str::to_string),
        opening_hours: str_at(properties, &["opening_hours"]).map(str::to_string),
        rating: number_at(properties, &["rating"])
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(0.0),
        description: String::new(),
    }
}

/// The longest category path in `categories` under the requested one, so a
/// pizzeria found by `catering.restaurant` reports `catering.restaurant.pizza`.
fn most_specific_category(properties: &Value, requested: PlaceCategory) -> String {
    let prefix = requested.as_str();
    properties
        .get("categories")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .filter(|c| {
            *c == prefix
                || c.strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('.'))
        })
        .max_by_key(|c| c.len())
        .unwrap_or(prefix)
        .to_string()
}

/// OSM-style `Mo-Fr 08:00-20:00; Sa 10:00-18:00` into one entry per rule.
fn split_opening_hours(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|rule| !rule.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
