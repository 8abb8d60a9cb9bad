//! Place search and photo enrichment for mapassist.
//!
//! [`PlaceSource`] wraps the Geoapify Places API; [`PhotoResolver`] runs the
//! photo cascade for one candidate at a time. Both degrade to empty values
//! instead of returning errors.

pub mod error;
pub mod geoapify;
pub mod http;
pub mod normalize;
pub mod photos;
pub mod race;
pub mod source;

pub use error::PlacesError;
pub use geoapify::GeoapifyClient;
pub use http::build_client;
pub use photos::{PhotoResolution, PhotoResolver};
pub use race::first_non_empty;
pub use source::PlaceSource;
