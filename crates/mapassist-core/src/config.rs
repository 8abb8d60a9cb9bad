use crate::app_config::{AppConfig, Environment, ProviderEndpoints};
use crate::defaults::{DEFAULT_GEMINI_MODEL, DEFAULT_SEARCH_LIMIT, DEFAULT_SEARCH_RADIUS_M};
use crate::ConfigError;

const DEFAULT_SCRAPER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank keys count as missing so an empty `.env` entry disables the source.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
        or_default(var, &default.to_string())
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("MAPASSIST_ENV", "development"))?;
    let bind_addr = parse_addr("MAPASSIST_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("MAPASSIST_LOG_LEVEL", "info");

    let search_radius_m = parse_u32("MAPASSIST_SEARCH_RADIUS_M", DEFAULT_SEARCH_RADIUS_M)?;
    if search_radius_m == 0 {
        return Err(invalid(
            "MAPASSIST_SEARCH_RADIUS_M",
            "radius must be greater than zero".to_string(),
        ));
    }
    let search_limit = parse_u32("MAPASSIST_SEARCH_LIMIT", DEFAULT_SEARCH_LIMIT)?;
    if search_limit == 0 {
        return Err(invalid(
            "MAPASSIST_SEARCH_LIMIT",
            "limit must be greater than zero".to_string(),
        ));
    }
    let request_timeout_secs = parse_u64("MAPASSIST_REQUEST_TIMEOUT_SECS", "15")?;

    let defaults = ProviderEndpoints::default();
    let endpoint = |var: &str, default: String| -> String {
        optional(var).map_or(default, |v| v.trim_end_matches('/').to_string())
    };
    let endpoints = ProviderEndpoints {
        gemini: endpoint("MAPASSIST_GEMINI_BASE_URL", defaults.gemini),
        geoapify: endpoint("MAPASSIST_GEOAPIFY_BASE_URL", defaults.geoapify),
        wikidata: endpoint("MAPASSIST_WIKIDATA_BASE_URL", defaults.wikidata),
        yelp: endpoint("MAPASSIST_YELP_BASE_URL", defaults.yelp),
        foursquare: endpoint("MAPASSIST_FOURSQUARE_BASE_URL", defaults.foursquare),
        google_images: endpoint("MAPASSIST_GOOGLE_IMAGES_BASE_URL", defaults.google_images),
        bing_images: endpoint("MAPASSIST_BING_IMAGES_BASE_URL", defaults.bing_images),
        serpapi: endpoint("MAPASSIST_SERPAPI_BASE_URL", defaults.serpapi),
        pexels: endpoint("MAPASSIST_PEXELS_BASE_URL", defaults.pexels),
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        gemini_api_key: optional("GEMINI_API_KEY"),
        gemini_model: optional("MAPASSIST_GEMINI_MODEL")
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        geoapify_api_key: optional("GEOAPIFY_API_KEY"),
        yelp_api_key: optional("YELP_API_KEY"),
        foursquare_api_key: optional("FOURSQUARE_API_KEY"),
        pexels_api_key: optional("PEXELS_API_KEY"),
        serpapi_api_key: optional("SERPAPI_API_KEY"),
        search_radius_m,
        search_limit,
        request_timeout_secs,
        scraper_user_agent: or_default("MAPASSIST_SCRAPER_USER_AGENT", DEFAULT_SCRAPER_USER_AGENT),
        endpoints,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MAPASSIST_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
