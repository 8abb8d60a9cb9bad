use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use mapassist_core::{InterpretedIntent, PlaceCandidate, SearchQuery, SearchResults};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{json_body, validate_origin, validate_radius, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SearchRequest {
    pub query: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub radius_m: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct IntentRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RankRequest {
    pub places: Vec<PlaceCandidate>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

fn require_query(req_id: &RequestId, query: &str) -> Result<String, ApiError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ApiError::new(
            req_id.0.clone(),
            "validation_error",
            "query must not be blank",
        ));
    }
    Ok(query.to_string())
}

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SearchResults>>, ApiError> {
    let body = json_body(&req_id, payload)?;
    let text = require_query(&req_id, &body.query)?;
    let origin = validate_origin(&req_id, body.latitude, body.longitude)?;

    let pipeline = &state.services.pipeline;
    let radius_m = validate_radius(&req_id, body.radius_m, pipeline.source().default_radius_m())?;

    let results = pipeline
        .search_within(&SearchQuery { text, origin }, radius_m)
        .await;
    Ok(ApiResponse::new(results, req_id.0))
}

pub(super) async fn interpret(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<IntentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<InterpretedIntent>>, ApiError> {
    let body = json_body(&req_id, payload)?;
    let text = require_query(&req_id, &body.query)?;

    let intent = state.services.pipeline.interpreter().interpret(&text).await;
    Ok(ApiResponse::new(intent, req_id.0))
}

pub(super) async fn rank(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<RankRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<PlaceCandidate>>>, ApiError> {
    let body = json_body(&req_id, payload)?;

    let ranked = state
        .services
        .pipeline
        .ranker()
        .rank(body.places, &body.keywords)
        .await;
    Ok(ApiResponse::new(ranked, req_id.0))
}
