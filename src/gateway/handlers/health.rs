//! Health check handler

use std::sync::Arc;

use axum::extract::State;
use chrono::Utc;
use utoipa::ToSchema;

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, ok};

/// Health check response data
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_i64)]
    pub timestamp_ms: i64,
    #[schema(example = "0.1.0")]
    pub version: String,
    /// `postgres` or `memory`
    #[schema(example = "postgres")]
    pub storage: String,
}

/// Health check endpoint
///
/// Pings the database when one is configured, without exposing details.
///
/// - Healthy: 200 OK + {"data": {timestamp_ms, version, storage}}
/// - Unhealthy: 503 Service Unavailable + {"error": {"message": "unavailable"}}
#[utoipa::path(
    get,
    path = "/v1/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json"),
        (status = 503, description = "Service unavailable")
    ),
    tag = "System"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<HealthResponse> {
    let storage = match &state.pg_db {
        Some(db) => {
            if let Err(e) = db.health_check().await {
                tracing::error!("[HEALTH] PostgreSQL ping failed: {}", e);
                return Err(ApiError::service_unavailable("unavailable"));
            }
            "postgres"
        }
        None => "memory",
    };

    ok(
        "data",
        HealthResponse {
            timestamp_ms: Utc::now().timestamp_millis(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            storage: storage.to_string(),
        },
    )
}
