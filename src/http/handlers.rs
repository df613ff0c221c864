use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiError;
use super::AppState;
use crate::config::{EmptyResultPolicy, MAX_LIMIT};
use crate::data::model::Dataset;
use crate::data::query;

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub keyword: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn checked_limit(limit: Option<usize>) -> Result<Option<usize>, ApiError> {
    match limit {
        Some(n) if !(1..=MAX_LIMIT).contains(&n) => Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {MAX_LIMIT}, got {n}"
        ))),
        other => Ok(other),
    }
}

fn rows_response(dataset: &Dataset, indices: &[usize]) -> Response {
    Json(dataset.records(indices)).into_response()
}

/// Render list/search results, honouring the configured empty-result policy.
fn listing_response(
    state: &AppState,
    dataset: &Dataset,
    indices: &[usize],
    what: &str,
) -> Result<Response, ApiError> {
    if indices.is_empty() && state.config.empty_results == EmptyResultPolicy::NotFound {
        return Err(ApiError::NotFound(format!("No records found for {what}")));
    }
    Ok(rows_response(dataset, indices))
}

fn range_response(dataset: &Dataset, niche: &str, end_id: i64) -> Result<Response, ApiError> {
    let indices = query::id_range_indices(dataset, end_id);
    if indices.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No records found in '{niche}' for ids 1 to {end_id}"
        )));
    }
    Ok(rows_response(dataset, &indices))
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Dataset API. Use /records to fetch data."
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "cached_datasets": state.registry.cache().len(),
    }))
}

/// `GET /get_data?keyword=` on the default dataset.
pub async fn get_data(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let ds = state.dataset(&state.config.default_dataset).await?;
    let indices = query::keyword_indices(&ds, &params.keyword);
    log::debug!("keyword '{}' matched {} rows", params.keyword, indices.len());
    listing_response(&state, &ds, &indices, &format!("keyword '{}'", params.keyword))
}

/// `GET /datasets/{niche}/search?keyword=`
pub async fn search_niche(
    State(state): State<AppState>,
    Path(niche): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let ds = state.dataset(&niche).await?;
    let indices = query::keyword_indices(&ds, &params.keyword);
    listing_response(&state, &ds, &indices, &format!("keyword '{}'", params.keyword))
}

/// `GET /records?limit=` – first `limit` rows of the default dataset.
pub async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<Response, ApiError> {
    let limit = checked_limit(params.limit)?;
    let ds = state.dataset(&state.config.default_dataset).await?;
    let indices = match limit {
        Some(n) => query::head_indices(&ds, n),
        None => query::all_indices(&ds),
    };
    listing_response(&state, &ds, &indices, "the default dataset")
}

/// `GET /records/{segment}`: a numeric segment is a record id in the default
/// dataset, anything else names a niche.
pub async fn records_segment(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    Query(params): Query<LimitParams>,
) -> Result<Response, ApiError> {
    match segment.trim().parse::<i64>() {
        Ok(id) => record_by_id(&state, id).await,
        Err(_) => niche_records(&state, &segment, params.limit).await,
    }
}

async fn record_by_id(state: &AppState, id: i64) -> Result<Response, ApiError> {
    let ds = state.dataset(&state.config.default_dataset).await?;
    let idx = query::find_by_id(&ds, id)
        .ok_or_else(|| ApiError::NotFound("Record not found".to_string()))?;
    match ds.record(idx) {
        Some(record) => Ok(Json(record).into_response()),
        None => Err(ApiError::NotFound("Record not found".to_string())),
    }
}

async fn niche_records(
    state: &AppState,
    niche: &str,
    limit: Option<usize>,
) -> Result<Response, ApiError> {
    let limit = checked_limit(limit)?;
    let ds = state.dataset(niche).await?;
    match limit {
        // Bounded by MAX_LIMIT, so the cast cannot wrap.
        Some(n) => range_response(&ds, niche, n as i64),
        None => listing_response(state, &ds, &query::all_indices(&ds), niche),
    }
}

/// `GET /records/{niche}/{end_id}`
pub async fn niche_range(
    State(state): State<AppState>,
    Path((niche, end_id)): Path<(String, i64)>,
) -> Result<Response, ApiError> {
    let ds = state.dataset(&niche).await?;
    range_response(&ds, &niche, end_id)
}
