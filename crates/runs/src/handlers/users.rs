//! User listing, role-tagged views, and per-athlete info.

use axum::{
    Extension,
    extract::{Path, Query},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    analytics,
    errors::AppError,
    models::{AthleteInfo, Role, User, UserSummary, UserView},
    store::Store,
};

use super::pagination::{PaginatedResponse, default_limit, paginate};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be between 1 and 150 characters"))]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
}

pub async fn create_user(
    Extension(store): Extension<Store>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<User>, AppError> {
    req.validate()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    let user = User::new(req.username, req.first_name, req.last_name, req.role);
    store.insert_user(user.clone());
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    /// "coach" or "athlete"; everything when absent.
    #[serde(default, rename = "type")]
    pub role: Option<Role>,
    /// Substring match against first and last name.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

pub async fn list_users(
    Extension(store): Extension<Store>,
    Query(query): Query<UserListQuery>,
) -> Json<PaginatedResponse<UserSummary>> {
    let search = query.search.as_deref().map(str::to_lowercase);
    let users: Vec<UserSummary> = store
        .list_users()
        .into_iter()
        .filter(|u| query.role.is_none_or(|role| u.role == role))
        .filter(|u| {
            search.as_deref().is_none_or(|s| {
                u.first_name.to_lowercase().contains(s) || u.last_name.to_lowercase().contains(s)
            })
        })
        .map(|u| UserSummary {
            runs_finished: store.count_finished_runs(u.id),
            id: u.id,
            date_joined: u.date_joined,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            role: u.role,
        })
        .collect();

    Json(paginate(users, query.limit, query.offset))
}

pub async fn get_user(
    Extension(store): Extension<Store>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserView>, AppError> {
    let user = store.get_user(id).ok_or(AppError::NotFound)?;
    let view = match user.role {
        Role::Coach => UserView::Coach {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            date_joined: user.date_joined,
            athletes: store.subscribers_of(user.id),
            rating: analytics::coach_rating(&store, user.id),
        },
        Role::Athlete => UserView::Athlete {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            date_joined: user.date_joined,
            coach: store.coach_of(user.id),
            runs_finished: store.count_finished_runs(user.id),
        },
    };
    Ok(Json(view))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AthleteInfoRequest {
    #[serde(default)]
    pub goals: String,
    #[validate(range(min = 1, max = 899, message = "Weight must be between 0 and 900 kg"))]
    pub weight: i32,
}

pub async fn get_athlete_info(
    Extension(store): Extension<Store>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<AthleteInfo>, AppError> {
    store.get_user(user_id).ok_or(AppError::NotFound)?;
    let info = store
        .get_athlete_info(user_id)
        .unwrap_or_else(|| AthleteInfo::empty(user_id));
    Ok(Json(info))
}

pub async fn put_athlete_info(
    Extension(store): Extension<Store>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<AthleteInfoRequest>,
) -> Result<Json<AthleteInfo>, AppError> {
    store.get_user(user_id).ok_or(AppError::NotFound)?;
    req.validate()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    let info = AthleteInfo {
        user_id,
        goals: req.goals,
        weight: req.weight,
    };
    store.upsert_athlete_info(info.clone());
    Ok(Json(info))
}
