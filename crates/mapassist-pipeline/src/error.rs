use mapassist_ai::AiError;
use mapassist_places::PlacesError;
use thiserror::Error;

/// Failures while wiring the services together at startup.
///
/// Once built, the services never return errors; every stage degrades to
/// an empty or unchanged value instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("generative model client: {0}")]
    Ai(#[from] AiError),

    #[error("place provider client: {0}")]
    Places(#[from] PlacesError),
}
