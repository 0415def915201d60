use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};
use tax_core::calculations::applicable_rate;
use tax_core::{RepositoryError, TaxRecord};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::models::{RateQuery, TaxRecordPayload};
use crate::state::AppState;

/// Liveness check.
pub async fn health() -> &'static str {
    "OK"
}

/// `GET /api/tax?municipality=..&date=..`
///
/// Responds with the bare rate of the narrowest window covering `date`,
/// written as a JSON number with the stored scale.
pub async fn get_rate(
    State(state): State<AppState>,
    query: Result<Query<RateQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;

    let candidates = state.repo.find_records(&query.municipality, query.date).await?;
    debug!(
        municipality = %query.municipality,
        date = %query.date,
        candidates = candidates.len(),
        "resolving rate"
    );
    let rate = applicable_rate(&candidates)?;

    let number: serde_json::Number = rate
        .to_string()
        .parse()
        .map_err(|e| ApiError::Internal(anyhow::Error::new(e).context("encoding rate")))?;
    Ok(Json(number))
}

pub async fn list_records(State(state): State<AppState>) -> Result<Json<Vec<TaxRecord>>, ApiError> {
    Ok(Json(state.repo.list_records().await?))
}

pub async fn create_record(
    State(state): State<AppState>,
    payload: Result<Json<TaxRecordPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    payload.require_municipality()?;
    payload.require_ordered_window()?;

    let record = state.repo.insert_record(payload.into()).await?;
    info!(id = record.id, municipality = %record.municipality, "created tax record");

    let location = format!(
        "/api/tax?{}",
        RateQuery {
            municipality: record.municipality.clone(),
            date: record.start_date,
        }
        .to_query_string()?
    );

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(record)))
}

/// `PUT /api/tax/:id`. Updating an id that does not exist is silently
/// accepted.
pub async fn replace_record(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TaxRecordPayload>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    payload.require_municipality()?;
    payload.require_id(id)?;

    state.repo.update_record(&TaxRecord::from(payload)).await?;
    info!(id, "replaced tax record");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_record(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;

    match state.repo.get_record(id).await {
        Ok(_) => {}
        Err(RepositoryError::NotFound) => {
            return Err(ApiError::NotFound(format!("Tax record with ID={id} not found.")));
        }
        Err(e) => return Err(e.into()),
    }

    state.repo.delete_record(id).await?;
    info!(id, "deleted tax record");

    Ok(StatusCode::NO_CONTENT)
}
