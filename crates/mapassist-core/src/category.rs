//! Universal place-category allow-list.
//!
//! Values are Geoapify category paths, which double as the universal
//! vocabulary handed to the language model and to every photo source.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceCategory {
    #[serde(rename = "catering.cafe")]
    Cafe,
    #[serde(rename = "catering.cafe.coffee_shop")]
    CoffeeShop,
    #[serde(rename = "catering.restaurant")]
    Restaurant,
    #[serde(rename = "catering.restaurant.pizza")]
    Pizza,
    #[serde(rename = "catering.bar")]
    Bar,
    #[serde(rename = "catering.pub")]
    Pub,
    #[serde(rename = "catering.fast_food")]
    FastFood,
    #[serde(rename = "entertainment.cinema")]
    Cinema,
    #[serde(rename = "entertainment.museum")]
    Museum,
    #[serde(rename = "accommodation.hotel")]
    Hotel,
    #[serde(rename = "leisure.park")]
    Park,
    #[serde(rename = "sport.fitness")]
    Fitness,
    #[serde(rename = "education.library")]
    Library,
    #[serde(rename = "healthcare.pharmacy")]
    Pharmacy,
    #[serde(rename = "commercial.supermarket")]
    Supermarket,
    #[serde(rename = "commercial.shopping_mall")]
    ShoppingMall,
    #[serde(rename = "tourism.sights")]
    Sights,
}

impl PlaceCategory {
    /// Every allowed category, in prompt order.
    pub const ALL: [PlaceCategory; 17] = [
        PlaceCategory::Cafe,
        PlaceCategory::CoffeeShop,
        PlaceCategory::Restaurant,
        PlaceCategory::Pizza,
        PlaceCategory::Bar,
        PlaceCategory::Pub,
        PlaceCategory::FastFood,
        PlaceCategory::Cinema,
        PlaceCategory::Museum,
        PlaceCategory::Hotel,
        PlaceCategory::Park,
        PlaceCategory::Fitness,
        PlaceCategory::Library,
        PlaceCategory::Pharmacy,
        PlaceCategory::Supermarket,
        PlaceCategory::ShoppingMall,
        PlaceCategory::Sights,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PlaceCategory::Cafe => "catering.cafe",
            PlaceCategory::CoffeeShop => "catering.cafe.coffee_shop",
            PlaceCategory::Restaurant => "catering.restaurant",
            PlaceCategory::Pizza => "catering.restaurant.pizza",
            PlaceCategory::Bar => "catering.bar",
            PlaceCategory::Pub => "catering.pub",
            PlaceCategory::FastFood => "catering.fast_food",
            PlaceCategory::Cinema => "entertainment.cinema",
            PlaceCategory::Museum => "entertainment.museum",
            PlaceCategory::Hotel => "accommodation.hotel",
            PlaceCategory::Park => "leisure.park",
            PlaceCategory::Fitness => "sport.fitness",
            PlaceCategory::Library => "education.library",
            PlaceCategory::Pharmacy => "healthcare.pharmacy",
            PlaceCategory::Supermarket => "commercial.supermarket",
            PlaceCategory::ShoppingMall => "commercial.shopping_mall",
            PlaceCategory::Sights => "tourism.sights",
        }
    }

    /// Last path segment, e.g. `cafe` for `catering.cafe`.
    #[must_use]
    pub fn leaf(self) -> &'static str {
        category_leaf(self.as_str())
    }

    /// Resolve a model- or user-supplied label against the allow-list.
    ///
    /// Accepts the full path in any case (`Catering.Cafe`) or a bare leaf
    /// (`cafe`, `coffee_shop`). Returns `None` for anything outside the list.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_ascii_lowercase();
        if wanted.is_empty() {
            return None;
        }

        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .or_else(|| Self::ALL.into_iter().find(|c| c.leaf() == wanted))
    }
}

impl std::fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last dot-separated segment of any category string.
///
/// Works on provider strings that are not in the allow-list too
/// (`commercial.food_and_drink.bakery` → `bakery`).
#[must_use]
pub fn category_leaf(category: &str) -> &str {
    category.rsplit('.').next().unwrap_or(category).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_full_path() {
        assert_eq!(
            PlaceCategory::parse("catering.bar"),
            Some(PlaceCategory::Bar)
        );
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(
            PlaceCategory::parse("  Catering.Cafe "),
            Some(PlaceCategory::Cafe)
        );
    }

    #[test]
    fn parse_accepts_bare_leaf() {
        assert_eq!(PlaceCategory::parse("park"), Some(PlaceCategory::Park));
        assert_eq!(
            PlaceCategory::parse("coffee_shop"),
            Some(PlaceCategory::CoffeeShop)
        );
    }

    #[test]
    fn parse_rejects_unknown_category() {
        assert_eq!(PlaceCategory::parse("catering.spaceport"), None);
        assert_eq!(PlaceCategory::parse(""), None);
    }

    #[test]
    fn leaf_is_last_segment() {
        assert_eq!(PlaceCategory::Cafe.leaf(), "cafe");
        assert_eq!(PlaceCategory::Pizza.leaf(), "pizza");
        assert_eq!(category_leaf("leisure"), "leisure");
    }

    #[test]
    fn serde_uses_category_path() {
        let json = serde_json::to_string(&PlaceCategory::ShoppingMall).expect("serialize");
        assert_eq!(json, "\"commercial.shopping_mall\"");
        let back: PlaceCategory = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, PlaceCategory::ShoppingMall);
    }

    #[test]
    fn as_str_matches_serde_name_for_every_variant() {
        for category in PlaceCategory::ALL {
            let json = serde_json::to_string(&category).expect("serialize");
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }
}
