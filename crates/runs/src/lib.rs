pub mod analytics;
pub mod collectibles;
pub mod config;
pub mod errors;
pub mod geo_math;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod rules;
pub mod store;
pub mod telemetry;

use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

use crate::{
    config::AppConfig,
    handlers::{
        append_position, company_details, create_run, create_user, get_athlete_info,
        get_coach_analytics, get_coach_rating, get_run, get_user, health_check,
        ingest_collectibles, list_challenges, list_collectibles, list_positions, list_runs,
        list_users, put_athlete_info, rate_coach, start_run, stop_run, subscribe_to_coach,
    },
    store::Store,
};

pub fn create_router(store: Store, config: AppConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/company_details", get(company_details))
        // User routes
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user))
        .route(
            "/athlete_info/{user_id}",
            get(get_athlete_info).put(put_athlete_info),
        )
        // Run lifecycle routes
        .route("/runs", get(list_runs).post(create_run))
        .route("/runs/{id}", get(get_run))
        .route("/runs/{id}/start", post(start_run))
        .route("/runs/{id}/stop", post(stop_run))
        .route(
            "/runs/{id}/positions",
            get(list_positions).post(append_position),
        )
        // Achievements and collectibles
        .route("/challenges", get(list_challenges))
        .route(
            "/collectibles",
            get(list_collectibles).post(ingest_collectibles),
        )
        // Coach routes
        .route("/coaches/{id}/subscribe", post(subscribe_to_coach))
        .route("/coaches/{id}/rate", post(rate_coach))
        .route("/coaches/{id}/analytics", get(get_coach_analytics))
        .route("/coaches/{id}/rating", get(get_coach_rating))
        .layer(Extension(store))
        .layer(Extension(config))
        .layer(cors)
        .layer(CompressionLayer::new())
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
}

pub async fn run_server(store: Store, config: AppConfig, port: u16) -> anyhow::Result<()> {
    let app = create_router(store, config);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    tracing::info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
