//! Business-directory lookups (Yelp, then Foursquare) by name and position.
//!
//! Besides a photo, both directories return ancillary fields (phone, hours,
//! a category label used as a short description) that are merged into the
//! candidate at this step only.

use mapassist_core::defaults::{
    DEFAULT_FOURSQUARE_CATEGORY, FOURSQUARE_MATCH_RADIUS_M, YELP_MATCH_RADIUS_M,
};
use mapassist_core::{DirectoryDetails, PlaceCandidate};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;

use crate::error::PlacesError;
use crate::http::{encode_component, endpoint, send_json};
use crate::photos::embedded::is_http_url;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Universal category → Foursquare category id. Sub-categories missing here
/// resolve through their parent path.
const FOURSQUARE_CATEGORIES: &[(&str, &str)] = &[
    ("catering.cafe", "13032"),
    ("catering.cafe.coffee_shop", "13035"),
    ("catering.restaurant", "13065"),
    ("catering.restaurant.pizza", "13064"),
    ("catering.bar", "13003"),
    ("catering.pub", "13018"),
    ("catering.fast_food", "13145"),
    ("entertainment.cinema", "10024"),
    ("entertainment.museum", "10027"),
    ("accommodation.hotel", "19014"),
    ("leisure.park", "16032"),
    ("sport.fitness", "18021"),
    ("education.library", "12080"),
    ("healthcare.pharmacy", "17035"),
    ("commercial.supermarket", "17069"),
    ("commercial.shopping_mall", "17114"),
    ("tourism.sights", "16000"),
];

/// What one directory knows about a place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryHit {
    pub photo_url: Option<String>,
    pub details: DirectoryDetails,
}

/// Foursquare category id for a universal category path.
#[must_use]
pub fn foursquare_category(category: &str) -> &'static str {
    let mut path = category.trim();
    loop {
        if let Some((_, id)) = FOURSQUARE_CATEGORIES.iter().find(|(c, _)| *c == path) {
            return *id;
        }
        match path.rsplit_once('.') {
            Some((parent, _)) => path = parent,
            None => return DEFAULT_FOURSQUARE_CATEGORY,
        }
    }
}

// ---------------------------------------------------------------------------
// Yelp Fusion
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct YelpSearch {
    #[serde(default)]
    businesses: Vec<YelpBusiness>,
}

#[derive(Debug, Deserialize)]
struct YelpBusiness {
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    display_phone: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    categories: Vec<YelpCategory>,
    #[serde(default)]
    hours: Vec<YelpHours>,
}

#[derive(Debug, Deserialize)]
struct YelpCategory {
    title: String,
}

#[derive(Debug, Deserialize)]
struct YelpHours {
    #[serde(default)]
    open: Vec<YelpOpening>,
}

#[derive(Debug, Deserialize)]
struct YelpOpening {
    day: usize,
    start: String,
    end: String,
}

#[derive(Clone)]
pub struct YelpSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for YelpSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YelpSource")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl YelpSource {
    #[must_use]
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Best business match by name within [`YELP_MATCH_RADIUS_M`].
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] on network failure, a non-2xx status, or an
    /// unexpected body.
    pub async fn lookup(&self, place: &PlaceCandidate) -> Result<Option<DirectoryHit>, PlacesError> {
        let mut url = endpoint(&self.base_url, "v3/businesses/search")?;
        url.query_pairs_mut()
            .append_pair("term", &place.name)
            .append_pair("latitude", &place.coordinates.latitude.to_string())
            .append_pair("longitude", &place.coordinates.longitude.to_string())
            .append_pair("radius", &YELP_MATCH_RADIUS_M.to_string())
            .append_pair("limit", "1");

        let search: YelpSearch = send_json(
            self.client.get(url).bearer_auth(&self.api_key),
            "yelp business search",
        )
        .await?;

        Ok(search.businesses.into_iter().next().map(yelp_hit))
    }
}

fn yelp_hit(business: YelpBusiness) -> DirectoryHit {
    let phone = business
        .display_phone
        .filter(|p| !p.trim().is_empty())
        .or(business.phone)
        .filter(|p| !p.trim().is_empty());

    DirectoryHit {
        photo_url: business.image_url.filter(|url| is_http_url(url)),
        details: DirectoryDetails {
            phone,
            description: business.categories.into_iter().next().map(|c| c.title),
            working_hours: business
                .hours
                .into_iter()
                .next()
                .map(|hours| hours.open.iter().filter_map(format_opening).collect())
                .unwrap_or_default(),
        },
    }
}

/// `{day: 0, start: "0800", end: "2000"}` → `Mon 08:00-20:00`.
fn format_opening(opening: &YelpOpening) -> Option<String> {
    let day = WEEKDAYS.get(opening.day)?;
    Some(format!(
        "{day} {}-{}",
        format_clock(&opening.start)?,
        format_clock(&opening.end)?
    ))
}

fn format_clock(hhmm: &str) -> Option<String> {
    if hhmm.len() != 4 || !hhmm.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{}:{}", &hhmm[..2], &hhmm[2..]))
}

// ---------------------------------------------------------------------------
// Foursquare Places
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FoursquareSearch {
    #[serde(default)]
    results: Vec<FoursquarePlace>,
}

#[derive(Debug, Deserialize)]
struct FoursquarePlace {
    fsq_id: String,
    #[serde(default)]
    categories: Vec<FoursquareCategory>,
    #[serde(default)]
    tel: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FoursquareCategory {
    name: String,
}

#[derive(Debug, Deserialize)]
struct FoursquarePhoto {
    prefix: String,
    suffix: String,
}

#[derive(Clone)]
pub struct FoursquareSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for FoursquareSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoursquareSource")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl FoursquareSource {
    #[must_use]
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Nearest place of the mapped category within
    /// [`FOURSQUARE_MATCH_RADIUS_M`], plus its first photo.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] if the search call fails. A failing photo call
    /// only drops the photo.
    pub async fn lookup(&self, place: &PlaceCandidate) -> Result<Option<DirectoryHit>, PlacesError> {
        let mut url = endpoint(&self.base_url, "v3/places/search")?;
        url.query_pairs_mut()
            .append_pair("query", &place.name)
            .append_pair(
                "ll",
                &format!(
                    "{},{}",
                    place.coordinates.latitude, place.coordinates.longitude
                ),
            )
            .append_pair("radius", &FOURSQUARE_MATCH_RADIUS_M.to_string())
            .append_pair("limit", "1")
            .append_pair("categories", foursquare_category(&place.category));

        let search: FoursquareSearch =
            send_json(self.authorized(url), "foursquare place search").await?;
        let Some(found) = search.results.into_iter().next() else {
            return Ok(None);
        };

        let photo_url = match self.first_photo(&found.fsq_id).await {
            Ok(photo) => photo,
            Err(e) => {
                tracing::warn!(
                    source = "foursquare",
                    fsq_id = %found.fsq_id,
                    error = %e,
                    "photo listing failed"
                );
                None
            }
        };

        Ok(Some(DirectoryHit {
            photo_url,
            details: DirectoryDetails {
                phone: found.tel.filter(|t| !t.trim().is_empty()),
                description: found.categories.into_iter().next().map(|c| c.name),
                working_hours: Vec::new(),
            },
        }))
    }

    async fn first_photo(&self, fsq_id: &str) -> Result<Option<String>, PlacesError> {
        let mut url = endpoint(
            &self.base_url,
            &format!("v3/places/{}/photos", encode_component(fsq_id)),
        )?;
        url.query_pairs_mut().append_pair("limit", "1");

        let photos: Vec<FoursquarePhoto> =
            send_json(self.authorized(url), "foursquare place photos").await?;
        Ok(photos
            .into_iter()
            .next()
            .map(|p| format!("{}original{}", p.prefix, p.suffix))
            .filter(|url| is_http_url(url)))
    }

    /// Foursquare v3 takes the raw key, without a `Bearer` scheme.
    fn authorized(&self, url: reqwest::Url) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, &self.api_key)
    }
}

/// Fill empty fields of `into` from `from`.
pub(crate) fn absorb(into: &mut DirectoryDetails, from: DirectoryDetails) {
    if into.phone.as_deref().is_none_or(str::is_empty) {
        into.phone = from.phone.or(into.phone.take());
    }
    if into.description.as_deref().is_none_or(str::is_empty) {
        into.description = from.description.or(into.description.take());
    }
    if into.working_hours.is_empty() {
        into.working_hours = from.working_hours;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foursquare_category_uses_table_then_parent_then_default() {
        assert_eq!(foursquare_category("catering.cafe"), "13032");
        assert_eq!(foursquare_category("catering.cafe.coffee_shop"), "13035");
        assert_eq!(foursquare_category("catering.restaurant.sushi"), "13065");
        assert_eq!(foursquare_category("leisure.park.garden"), "16032");
        assert_eq!(foursquare_category("office.coworking"), DEFAULT_FOURSQUARE_CATEGORY);
        assert_eq!(foursquare_category(""), DEFAULT_FOURSQUARE_CATEGORY);
    }

    #[test]
    fn yelp_hit_maps_business() {
        let business: YelpBusiness = serde_json::from_value(serde_json::json!({
            "image_url": "https://s3-media.yelp.example/bphoto/a/o.jpg",
            "phone": "+380322970665",
            "display_phone": "+380 32 297 0665",
            "categories": [{ "alias": "coffee", "title": "Coffee & Tea" }],
            "hours": [{ "open": [
                { "day": 0, "start": "0800", "end": "2000", "is_overnight": false },
                { "day": 6, "start": "1000", "end": "1800", "is_overnight": false }
            ] }]
        }))
        .expect("valid business");

        let hit = yelp_hit(business);
        assert_eq!(
            hit.photo_url.as_deref(),
            Some("https://s3-media.yelp.example/bphoto/a/o.jpg")
        );
        assert_eq!(hit.details.phone.as_deref(), Some("+380 32 297 0665"));
        assert_eq!(hit.details.description.as_deref(), Some("Coffee & Tea"));
        assert_eq!(
            hit.details.working_hours,
            vec!["Mon 08:00-20:00", "Sun 10:00-18:00"]
        );
    }

    #[test]
    fn yelp_hit_without_image_or_display_phone() {
        let business: YelpBusiness = serde_json::from_value(serde_json::json!({
            "image_url": "",
            "phone": "+15550100",
            "display_phone": ""
        }))
        .expect("valid business");

        let hit = yelp_hit(business);
        assert!(hit.photo_url.is_none());
        assert_eq!(hit.details.phone.as_deref(), Some("+15550100"));
        assert!(hit.details.working_hours.is_empty());
    }

    #[test]
    fn malformed_clock_values_are_skipped() {
        let opening = YelpOpening {
            day: 9,
            start: "0800".to_string(),
            end: "2000".to_string(),
        };
        assert!(format_opening(&opening).is_none());
        assert!(format_clock("8:00").is_none());
        assert_eq!(format_clock("2330").as_deref(), Some("23:30"));
    }

    #[test]
    fn absorb_keeps_first_values() {
        let mut acc = DirectoryDetails {
            phone: Some("+1".to_string()),
            description: None,
            working_hours: Vec::new(),
        };
        absorb(
            &mut acc,
            DirectoryDetails {
                phone: Some("+2".to_string()),
                description: Some("Bakery".to_string()),
                working_hours: vec!["Mon 08:00-20:00".to_string()],
            },
        );
        assert_eq!(acc.phone.as_deref(), Some("+1"));
        assert_eq!(acc.description.as_deref(), Some("Bakery"));
        assert_eq!(acc.working_hours.len(), 1);
    }
}
