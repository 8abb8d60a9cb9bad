//! The place-search pipeline and the place-detail path, wired from
//! configuration.

pub mod detail;
pub mod error;
pub mod pipeline;
pub mod services;

pub use detail::PlaceDetailService;
pub use error::PipelineError;
pub use pipeline::Pipeline;
pub use services::{ProviderStatus, Services};
