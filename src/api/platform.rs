//! Platform endpoints: health, feature catalogue, dashboard data, simulated
//! uploads, and mock LLM connections.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{created, ok, required};
use crate::api_errors::ApiError;
use crate::app_state::AppState;
use crate::errors::{SafeRead, SafeWrite};
use crate::platform::{
    compliance_snapshot, feature_catalogue, LlmConnection, RegulationSyncStatus, UploadedFile,
    TOTAL_FEATURES,
};

pub async fn health(
    State(st): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(ok(json!({
        "status": "healthy",
        "service": "ZenThera AI Compliance Suite",
        "version": env!("CARGO_PKG_VERSION"),
        "features_active": st.platform.active_feature_count()?,
        "total_features": TOTAL_FEATURES,
        "started_at": st.started_at,
        "timestamp": Utc::now(),
    })))
}

pub async fn features(
    State(st): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(ok(json!({
        "features": feature_catalogue(),
        "total_features": TOTAL_FEATURES,
        "active_features": st.platform.active_feature_count()?,
    })))
}

pub async fn dashboard_data(
    State(st): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(ok(json!({
        "compliance_data": compliance_snapshot(),
        "active_features": st.platform.active_feature_count()?,
        "regulation_sync": RegulationSyncStatus::default(),
        "uploaded_files": st.platform.uploaded_files.safe_read()?.len(),
        "llm_connected": st.platform.llm_connected()?,
        "last_updated": Utc::now(),
    })))
}

#[derive(Deserialize)]
pub struct UploadRequest {
    #[serde(default)]
    files: Vec<String>,
}

/// Simulated upload: nothing is stored beyond metadata, sizes are invented.
pub async fn upload_documents(
    State(st): State<Arc<AppState>>,
    Json(req): Json<UploadRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if req.files.is_empty() {
        return Err(ApiError::bad_request("No files provided"));
    }

    let mut rng = rand::rng();
    let uploaded: Vec<UploadedFile> = req
        .files
        .iter()
        .filter(|name| !name.trim().is_empty())
        .map(|name| UploadedFile::new(name.clone(), rng.random_range(50..500)))
        .collect();

    let total_files = {
        let mut files = st.platform.uploaded_files.safe_write()?;
        files.extend(uploaded.iter().cloned());
        files.len()
    };

    tracing::info!("Simulated upload of {} document(s)", uploaded.len());

    Ok(ok(json!({
        "message": format!("{} files uploaded successfully", uploaded.len()),
        "files": uploaded,
        "total_files": total_files,
    })))
}

#[derive(Deserialize)]
pub struct ConnectLlmRequest {
    provider: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    method: Option<String>,
    #[serde(default)]
    endpoint: String,
}

/// Register a mock LLM connection; the API key is checked for presence and
/// discarded.
pub async fn connect_llm(
    State(st): State<Arc<AppState>>,
    Json(req): Json<ConnectLlmRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let provider = required(req.provider, "provider")?;
    let _api_key = required(req.api_key, "api_key")?;
    let model = required(req.model, "model")?;
    let method = required(req.method, "method")?;

    let connection = LlmConnection {
        id: Uuid::new_v4().to_string(),
        provider,
        model,
        method,
        endpoint: req.endpoint,
        connected_at: Utc::now(),
        status: "active".to_string(),
    };

    st.platform
        .connections
        .safe_write()?
        .insert(connection.id.clone(), connection.clone());
    *st.platform.current_connection.safe_write()? = Some(connection.id.clone());

    tracing::info!(
        "LLM connection registered: provider={}, model={}",
        connection.provider,
        connection.model
    );

    Ok(created(json!({
        "message": "LLM connected successfully",
        "connection": connection,
    })))
}
