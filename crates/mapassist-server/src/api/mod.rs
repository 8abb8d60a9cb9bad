mod places;
mod search;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use mapassist_core::Coordinates;
use mapassist_pipeline::Services;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Serialize, PartialEq, Eq)]
struct ProviderHealth {
    gemini: bool,
    geoapify: bool,
    yelp: bool,
    foursquare: bool,
    pexels: bool,
    serpapi: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    providers: ProviderHealth,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(request_id),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Unwraps a JSON body, turning axum's rejection into the error envelope.
pub(super) fn json_body<T>(
    req_id: &RequestId,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::new(req_id.0.clone(), "bad_request", rejection.body_text()))
}

/// Validates a client-supplied position before any provider is contacted.
pub(super) fn validate_origin(
    req_id: &RequestId,
    latitude: f64,
    longitude: f64,
) -> Result<Coordinates, ApiError> {
    let origin = Coordinates::new(latitude, longitude);
    if origin.is_valid() {
        Ok(origin)
    } else {
        Err(ApiError::new(
            req_id.0.clone(),
            "validation_error",
            "latitude must be within -90..=90 and longitude within -180..=180",
        ))
    }
}

/// Resolves an optional radius against the configured default. Zero is
/// rejected.
pub(super) fn validate_radius(
    req_id: &RequestId,
    radius_m: Option<u32>,
    default_m: u32,
) -> Result<u32, ApiError> {
    match radius_m {
        Some(0) => Err(ApiError::new(
            req_id.0.clone(),
            "validation_error",
            "radius_m must be positive",
        )),
        Some(radius) => Ok(radius),
        None => Ok(default_m),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/search", post(search::search))
        .route("/api/v1/intent", post(search::interpret))
        .route("/api/v1/rank", post(search::rank))
        .route("/api/v1/places/search", post(places::search_places))
        .route("/api/v1/places/photo", post(places::resolve_photo))
        .route("/api/v1/places/{place_id}", get(places::place_details))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let status = state.services.providers;
    let data = HealthData {
        status: if status.geoapify { "ok" } else { "degraded" },
        providers: ProviderHealth {
            gemini: status.gemini,
            geoapify: status.geoapify,
            yelp: status.yelp,
            foursquare: status.foursquare,
            pexels: status.pexels,
            serpapi: status.serpapi,
        },
    };
    ApiResponse::new(data, req_id.0)
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
