//! Shared domain types, fallback defaults, and environment configuration
//! for the mapassist search services.

pub mod app_config;
pub mod category;
pub mod config;
pub mod defaults;
pub mod intent;
pub mod places;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, ProviderEndpoints};
pub use category::PlaceCategory;
pub use config::{load_app_config, load_app_config_from_env};
pub use intent::InterpretedIntent;
pub use places::{
    Coordinates, DirectoryDetails, PlaceCandidate, PlaceDetails, RankedResultSet, SearchQuery,
    SearchResults,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
