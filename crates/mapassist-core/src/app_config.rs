use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Base URLs for every third-party host the services talk to.
///
/// Defaults point at production; each one can be overridden so tests and
/// staging can route traffic to a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub gemini: String,
    pub geoapify: String,
    pub wikidata: String,
    pub yelp: String,
    pub foursquare: String,
    pub google_images: String,
    pub bing_images: String,
    pub serpapi: String,
    pub pexels: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            gemini: "https://generativelanguage.googleapis.com".to_string(),
            geoapify: "https://api.geoapify.com".to_string(),
            wikidata: "https://www.wikidata.org".to_string(),
            yelp: "https://api.yelp.com".to_string(),
            foursquare: "https://api.foursquare.com".to_string(),
            google_images: "https://www.google.com".to_string(),
            bing_images: "https://www.bing.com".to_string(),
            serpapi: "https://serpapi.com".to_string(),
            pexels: "https://api.pexels.com".to_string(),
        }
    }
}

impl ProviderEndpoints {
    /// Every endpoint pointed at one host, for mock-server tests.
    #[must_use]
    pub fn all(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            gemini: base.clone(),
            geoapify: base.clone(),
            wikidata: base.clone(),
            yelp: base.clone(),
            foursquare: base.clone(),
            google_images: base.clone(),
            bing_images: base.clone(),
            serpapi: base.clone(),
            pexels: base,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub geoapify_api_key: Option<String>,
    pub yelp_api_key: Option<String>,
    pub foursquare_api_key: Option<String>,
    pub pexels_api_key: Option<String>,
    pub serpapi_api_key: Option<String>,
    pub search_radius_m: u32,
    pub search_limit: u32,
    pub request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub endpoints: ProviderEndpoints,
}

impl AppConfig {
    /// Names of the provider key variables that are not set.
    ///
    /// Each missing key disables exactly one source for the process lifetime.
    #[must_use]
    pub fn missing_provider_keys(&self) -> Vec<&'static str> {
        [
            ("GEMINI_API_KEY", &self.gemini_api_key),
            ("GEOAPIFY_API_KEY", &self.geoapify_api_key),
            ("YELP_API_KEY", &self.yelp_api_key),
            ("FOURSQUARE_API_KEY", &self.foursquare_api_key),
            ("PEXELS_API_KEY", &self.pexels_api_key),
            ("SERPAPI_API_KEY", &self.serpapi_api_key),
        ]
        .into_iter()
        .filter(|(_, key)| key.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "[redacted]");
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("gemini_model", &self.gemini_model)
            .field("geoapify_api_key", &redact(&self.geoapify_api_key))
            .field("yelp_api_key", &redact(&self.yelp_api_key))
            .field("foursquare_api_key", &redact(&self.foursquare_api_key))
            .field("pexels_api_key", &redact(&self.pexels_api_key))
            .field("serpapi_api_key", &redact(&self.serpapi_api_key))
            .field("search_radius_m", &self.search_radius_m)
            .field("search_limit", &self.search_limit)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}
