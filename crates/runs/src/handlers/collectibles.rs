//! Collectible catalog ingestion and listing.
//!
//! The catalog is fed by an external feed of already-parsed rows; parsing
//! bulk upload files is not this service's concern. Valid rows are saved,
//! invalid rows are echoed back, matching the feed contract.

use std::collections::BTreeSet;

use axum::{Extension, response::Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{models::CollectibleItem, store::Store};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CollectibleRow {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "Uid must not be empty"))]
    pub uid: String,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be within [-90, 90]"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be within [-180, 180]"))]
    pub longitude: f64,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub value: i64,
}

#[derive(Debug, Serialize)]
pub struct CollectibleIngestResponse {
    pub created: usize,
    pub rejected: Vec<CollectibleRow>,
}

pub async fn ingest_collectibles(
    Extension(store): Extension<Store>,
    Json(rows): Json<Vec<CollectibleRow>>,
) -> Json<CollectibleIngestResponse> {
    let mut created = 0;
    let mut rejected = Vec::new();

    for row in rows {
        if row.validate().is_err() {
            rejected.push(row);
            continue;
        }
        store.insert_collectible(CollectibleItem {
            id: Uuid::new_v4(),
            name: row.name,
            uid: row.uid,
            latitude: row.latitude,
            longitude: row.longitude,
            picture: row.picture,
            value: row.value,
            acquired_by: BTreeSet::new(),
        });
        created += 1;
    }

    Json(CollectibleIngestResponse { created, rejected })
}

pub async fn list_collectibles(Extension(store): Extension<Store>) -> Json<Vec<CollectibleItem>> {
    Json(store.list_collectibles())
}
