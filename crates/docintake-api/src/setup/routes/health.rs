//! Health check handlers and response types.

use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, Json};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Run an async check with timeout; returns "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub database: String,
    pub storage: String,
    pub storage_backend: String,
    pub analysis_dispatch: String,
}

/// Liveness check: the process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness check: the database answers.
pub async fn readiness_check(state: Arc<AppState>) -> impl IntoResponse {
    let database = run_check(TIMEOUT, state.db.documents.ping(), "not_ready").await;
    let ready = database == "healthy";
    if !ready {
        tracing::error!(database = %database, "Database readiness check failed");
    }

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "not_ready" },
            "database": if ready { "ready".to_string() } else { database },
        })),
    )
}

/// Full health check. Only the database decides the status code; an
/// unreachable storage backend is reported as degraded.
pub async fn health_check(state: Arc<AppState>) -> impl IntoResponse {
    let database = run_check(TIMEOUT, state.db.documents.ping(), "unhealthy").await;
    let overall_healthy = database == "healthy";

    let storage = state.storage.clone();
    let storage_status = run_check(
        TIMEOUT,
        async move {
            storage
                .exists("health-check-non-existent-key")
                .await
                .map(drop)
        },
        "degraded",
    )
    .await;

    let response = HealthCheckResponse {
        status: if overall_healthy { "healthy" } else { "unhealthy" }.to_string(),
        database,
        storage: storage_status,
        storage_backend: state.storage.backend_type().to_string(),
        analysis_dispatch: state.config.analysis_dispatch_backend().to_string(),
    };

    let status_code = if overall_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
