//! Run CRUD glue and the start/stop transitions.

use axum::{
    Extension,
    extract::{Path, Query},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    errors::AppError,
    lifecycle,
    models::{Role, Run, RunStatus},
    store::Store,
};

use super::pagination::{PaginatedResponse, default_limit, paginate};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRunRequest {
    pub athlete_id: Uuid,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub comment: String,
}

pub async fn create_run(
    Extension(store): Extension<Store>,
    Json(req): Json<CreateRunRequest>,
) -> Result<Json<Run>, AppError> {
    req.validate()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    let athlete = store.get_user(req.athlete_id).ok_or(AppError::NotFound)?;
    if athlete.role != Role::Athlete {
        return Err(AppError::InvalidInput(
            "Runs can only be created for athletes".to_string(),
        ));
    }
    let run = Run::new(athlete.id, req.comment);
    store.insert_run(run.clone());
    Ok(Json(run))
}

#[derive(Debug, Deserialize)]
pub struct RunListQuery {
    #[serde(default)]
    pub status: Option<RunStatus>,
    #[serde(default)]
    pub athlete: Option<Uuid>,
    /// "created_at" (default) or "-created_at".
    #[serde(default)]
    pub ordering: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

pub async fn list_runs(
    Extension(store): Extension<Store>,
    Query(query): Query<RunListQuery>,
) -> Json<PaginatedResponse<Run>> {
    let mut runs: Vec<Run> = store
        .list_runs()
        .into_iter()
        .filter(|r| query.status.is_none_or(|s| r.status == s))
        .filter(|r| query.athlete.is_none_or(|a| r.athlete_id == a))
        .collect();
    if query.ordering.as_deref() == Some("-created_at") {
        runs.reverse();
    }
    Json(paginate(runs, query.limit, query.offset))
}

pub async fn get_run(
    Extension(store): Extension<Store>,
    Path(id): Path<Uuid>,
) -> Result<Json<Run>, AppError> {
    let run = store.get_run(id).ok_or(AppError::NotFound)?;
    Ok(Json(run))
}

pub async fn start_run(
    Extension(store): Extension<Store>,
    Path(id): Path<Uuid>,
) -> Result<Json<Run>, AppError> {
    let run = lifecycle::start_run(&store, id).await?;
    Ok(Json(run))
}

pub async fn stop_run(
    Extension(store): Extension<Store>,
    Path(id): Path<Uuid>,
) -> Result<Json<Run>, AppError> {
    let run = lifecycle::stop_run(&store, id).await?;
    Ok(Json(run))
}
