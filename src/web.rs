//! Router assembly: HTML pages, liveness probes, platform routes, and the
//! five nested feature routers, behind permissive CORS.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api;
use crate::app_state::AppState;
use crate::pages;

/// Build the full application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // server-rendered pages
        .route("/", get(pages::dashboard_page))
        .route("/setup", get(pages::setup_page))
        // liveness probes
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // platform endpoints
        .route("/api/health", get(api::platform::health))
        .route("/api/features", get(api::platform::features))
        .route("/api/dashboard-data", get(api::platform::dashboard_data))
        .route("/api/upload", post(api::platform::upload_documents))
        .route("/api/connect-llm", post(api::platform::connect_llm))
        // feature areas
        .nest("/api/compliance", api::compliance::routes())
        .nest("/api/regulation", api::regulation::routes())
        .nest("/api/observability", api::observability::routes())
        .nest("/api/narrative", api::narrative::routes())
        .nest("/api/failure", api::failure::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn readyz(State(st): State<Arc<AppState>>) -> Json<serde_json::Value> {
    // the service is ready once the stores exist; seeding is optional
    let seeded = st
        .compliance
        .scores
        .read()
        .map(|scores| !scores.is_empty())
        .unwrap_or(false);
    Json(serde_json::json!({ "ready": true, "demo_data": seeded }))
}
