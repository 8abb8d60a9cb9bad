//! Fallback values used whenever a provider, the model, or the caller omits
//! something. Every component reads its defaults from here.

use crate::category::PlaceCategory;

/// Category used when the model answer is missing, malformed, or outside
/// the allow-list.
pub const DEFAULT_CATEGORY: PlaceCategory = PlaceCategory::Cafe;

/// Rating assigned when the place provider does not report one.
pub const DEFAULT_RATING: f64 = 4.3;

/// Open/closed flag when the provider does not report one.
pub const DEFAULT_OPEN_NOW: bool = false;

/// Display name when the provider record has no name.
pub const DEFAULT_PLACE_NAME: &str = "Unknown place";

/// Search radius around the caller's position, in meters.
pub const DEFAULT_SEARCH_RADIUS_M: u32 = 2_500;

/// Upper bound on candidates requested from the place provider.
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Inclusive keyword bounds after interpretation.
pub const MIN_KEYWORDS: usize = 2;
pub const MAX_KEYWORDS: usize = 6;

/// Stock-photo query when a category has no usable leaf.
pub const STOCK_PHOTO_FALLBACK_QUERY: &str = "restaurant";

/// Foursquare category id used for categories missing from the mapping table
/// (Foursquare "Restaurant").
pub const DEFAULT_FOURSQUARE_CATEGORY: &str = "13065";

/// Directory lookup radii, in meters.
pub const YELP_MATCH_RADIUS_M: u32 = 200;
pub const FOURSQUARE_MATCH_RADIUS_M: u32 = 150;

/// Maximum image-search results inspected per engine.
pub const IMAGE_SEARCH_MAX_RESULTS: usize = 5;

/// Generative model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
