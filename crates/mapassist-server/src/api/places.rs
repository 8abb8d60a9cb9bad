use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use mapassist_core::{
    defaults::DEFAULT_CATEGORY, InterpretedIntent, PlaceCandidate, PlaceCategory, PlaceDetails,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{json_body, validate_origin, validate_radius, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct PlaceSearchRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub radius_m: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DetailParams {
    #[serde(default)]
    pub keywords: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct PhotoData {
    pub url: String,
}

/// Raw provider search for one category, without photos or ranking.
pub(super) async fn search_places(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<PlaceSearchRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<PlaceCandidate>>>, ApiError> {
    let body = json_body(&req_id, payload)?;
    let origin = validate_origin(&req_id, body.latitude, body.longitude)?;

    let category = match body.category.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_CATEGORY,
        Some(raw) => PlaceCategory::parse(raw).ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "validation_error",
                format!("unknown category: {raw}"),
            )
        })?,
    };

    let source = state.services.pipeline.source();
    let radius_m = validate_radius(&req_id, body.radius_m, source.default_radius_m())?;
    let intent = InterpretedIntent {
        category,
        keywords: Vec::new(),
    };

    let places = source.search(origin, &intent, radius_m).await;
    Ok(ApiResponse::new(places, req_id.0))
}

/// Runs the photo cascade for one candidate. The URL is empty when every
/// source came back empty.
pub(super) async fn resolve_photo(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<PlaceCandidate>, JsonRejection>,
) -> Result<Json<ApiResponse<PhotoData>>, ApiError> {
    let place = json_body(&req_id, payload)?;

    let resolution = state.services.pipeline.resolver().resolve_photo(&place).await;
    Ok(ApiResponse::new(
        PhotoData {
            url: resolution.url,
        },
        req_id.0,
    ))
}

pub(super) async fn place_details(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(place_id): Path<String>,
    Query(params): Query<DetailParams>,
) -> Result<Json<ApiResponse<PlaceDetails>>, ApiError> {
    let keywords = split_keywords(params.keywords.as_deref());

    match state.services.details.describe(&place_id, &keywords).await {
        Some(details) => Ok(ApiResponse::new(details, req_id.0)),
        None => Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("place {place_id} not found"),
        )),
    }
}

fn split_keywords(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
