//! Position ingestion and listing.

use axum::{
    Extension,
    extract::Path,
    response::Json,
};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use crate::{collectibles, errors::AppError, models::Position, store::Store, telemetry};

#[derive(Debug, Deserialize, Validate)]
pub struct AppendPositionRequest {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be within [-90, 90]"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be within [-180, 180]"))]
    pub longitude: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

pub async fn append_position(
    Extension(store): Extension<Store>,
    Path(run_id): Path<Uuid>,
    Json(req): Json<AppendPositionRequest>,
) -> Result<Json<Position>, AppError> {
    // Out-of-range coordinates are rejected before any ledger mutation.
    req.validate()
        .map_err(|e| AppError::InvalidCoordinate(e.to_string()))?;

    let run = store.get_run(run_id).ok_or(AppError::NotFound)?;
    let position =
        telemetry::append_position(&store, run_id, req.latitude, req.longitude, req.timestamp)
            .await?;

    // The proximity detector runs on every successful append.
    collectibles::process_position(&store, run.athlete_id, &position);

    Ok(Json(position))
}

pub async fn list_positions(
    Extension(store): Extension<Store>,
    Path(run_id): Path<Uuid>,
) -> Result<Json<Vec<Position>>, AppError> {
    store.get_run(run_id).ok_or(AppError::NotFound)?;
    Ok(Json(store.positions_by_time(run_id)))
}
