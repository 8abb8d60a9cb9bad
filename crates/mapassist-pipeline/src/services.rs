//! Builds every service from [`AppConfig`], sharing clients between them.

use mapassist_ai::{GeminiClient, PlaceDescriber, QueryInterpreter, RelevanceRanker};
use mapassist_core::AppConfig;
use mapassist_places::{build_client, PhotoResolver, PlaceSource};

use crate::detail::PlaceDetailService;
use crate::error::PipelineError;
use crate::pipeline::Pipeline;

/// Which providers have credentials, for health reporting.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderStatus {
    pub gemini: bool,
    pub geoapify: bool,
    pub yelp: bool,
    pub foursquare: bool,
    pub pexels: bool,
    pub serpapi: bool,
}

impl ProviderStatus {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            gemini: config.gemini_api_key.is_some(),
            geoapify: config.geoapify_api_key.is_some(),
            yelp: config.yelp_api_key.is_some(),
            foursquare: config.foursquare_api_key.is_some(),
            pexels: config.pexels_api_key.is_some(),
            serpapi: config.serpapi_api_key.is_some(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Services {
    pub pipeline: Pipeline,
    pub details: PlaceDetailService,
    pub providers: ProviderStatus,
}

impl Services {
    /// Wires the pipeline and the detail service.
    ///
    /// Each missing provider key is logged once here; the matching source
    /// stays disabled for the life of the process.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if an HTTP client cannot be built or a
    /// configured base URL does not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        for key in config.missing_provider_keys() {
            tracing::warn!(var = key, "API key not set, source disabled");
        }

        let http = build_client(config.request_timeout_secs)?;
        let gemini = config
            .gemini_api_key
            .as_deref()
            .map(|key| {
                GeminiClient::with_base_url(
                    key,
                    &config.gemini_model,
                    config.request_timeout_secs,
                    &config.endpoints.gemini,
                )
            })
            .transpose()?;

        let source = PlaceSource::from_config(config, &http)?;
        let pipeline = Pipeline::new(
            QueryInterpreter::new(gemini.clone()),
            source.clone(),
            PhotoResolver::from_config(config, &http),
            RelevanceRanker::new(gemini.clone()),
        );
        let details = PlaceDetailService::new(source, PlaceDescriber::new(gemini));

        Ok(Self {
            pipeline,
            details,
            providers: ProviderStatus::from_config(config),
        })
    }
}
