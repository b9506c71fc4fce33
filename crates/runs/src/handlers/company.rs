//! Health check and static company details.

use axum::{Extension, http::StatusCode, response::Json};
use serde::Serialize;

use crate::config::AppConfig;

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize)]
pub struct CompanyDetails {
    pub company_name: String,
    pub slogan: String,
    pub contacts: String,
}

pub async fn company_details(Extension(config): Extension<AppConfig>) -> Json<CompanyDetails> {
    Json(CompanyDetails {
        company_name: config.company_name,
        slogan: config.slogan,
        contacts: config.contacts,
    })
}
