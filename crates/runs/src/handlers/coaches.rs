//! Coach subscriptions, ratings, and per-coach analytics.

use axum::{
    Extension,
    extract::Path,
    response::Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    analytics,
    errors::AppError,
    models::{CoachAnalytics, Role},
    store::Store,
};

fn require_role(store: &Store, id: Uuid, role: Role) -> Result<(), AppError> {
    let user = store.get_user(id).ok_or(AppError::NotFound)?;
    if user.role != role {
        return Err(AppError::NotFound);
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub athlete_id: Uuid,
}

pub async fn subscribe_to_coach(
    Extension(store): Extension<Store>,
    Path(coach_id): Path<Uuid>,
    Json(req): Json<SubscribeRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_role(&store, coach_id, Role::Coach)?;
    require_role(&store, req.athlete_id, Role::Athlete)?;
    store.upsert_subscribe(coach_id, req.athlete_id);
    Ok(Json(serde_json::json!({ "subscribed": true })))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RateCoachRequest {
    pub athlete_id: Uuid,
    #[validate(range(exclusive_min = 0.0, max = 5.0, message = "Rating must be within (0, 5]"))]
    pub rating: f64,
}

pub async fn rate_coach(
    Extension(store): Extension<Store>,
    Path(coach_id): Path<Uuid>,
    Json(req): Json<RateCoachRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    req.validate()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    require_role(&store, coach_id, Role::Coach)?;
    // Only a subscribed athlete can rate the coach.
    if !store.set_rating(coach_id, req.athlete_id, req.rating) {
        return Err(AppError::NotFound);
    }
    Ok(Json(serde_json::json!({ "rating": req.rating })))
}

/// Empty object (not an error) when the coach has no athletes with data.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    #[serde(flatten)]
    pub analytics: Option<CoachAnalytics>,
}

pub async fn get_coach_analytics(
    Extension(store): Extension<Store>,
    Path(coach_id): Path<Uuid>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    require_role(&store, coach_id, Role::Coach)?;
    Ok(Json(AnalyticsResponse {
        analytics: analytics::coach_analytics(&store, coach_id),
    }))
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub rating: Option<f64>,
}

pub async fn get_coach_rating(
    Extension(store): Extension<Store>,
    Path(coach_id): Path<Uuid>,
) -> Result<Json<RatingResponse>, AppError> {
    require_role(&store, coach_id, Role::Coach)?;
    Ok(Json(RatingResponse {
        rating: analytics::coach_rating(&store, coach_id),
    }))
}
