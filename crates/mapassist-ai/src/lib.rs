//! Generative-text side of the search pipeline.
//!
//! Wraps the Gemini `generateContent` endpoint and builds the three model
//! calls the app makes: query interpretation, relevance ranking, and the
//! detail-screen place description. Model output is free text; structured
//! values are pulled out of it with [`extract`].

pub mod client;
pub mod describe;
pub mod error;
pub mod extract;
pub mod interpret;
pub mod rank;

pub use client::GeminiClient;
pub use describe::PlaceDescriber;
pub use error::AiError;
pub use extract::{extract, Extracted, ParseError, Shape};
pub use interpret::QueryInterpreter;
pub use rank::RelevanceRanker;
