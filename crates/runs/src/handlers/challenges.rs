//! Challenge grant listing.

use axum::{Extension, extract::Query, response::Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::{models::Challenge, store::Store};

#[derive(Debug, Deserialize)]
pub struct ChallengeListQuery {
    #[serde(default)]
    pub athlete: Option<Uuid>,
}

pub async fn list_challenges(
    Extension(store): Extension<Store>,
    Query(query): Query<ChallengeListQuery>,
) -> Json<Vec<Challenge>> {
    Json(store.list_challenges(query.athlete))
}
