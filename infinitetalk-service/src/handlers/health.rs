use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "infinitetalk-service",
        "version": env!("CARGO_PKG_VERSION"),
        "engine": state.generation.engine().name(),
    }))
}

/// Readiness probe: the inference engine must report healthy.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.generation.engine().health_check().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => {
            tracing::warn!(error = %e, "Inference engine not ready");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "detail": e.to_string() })),
            )
        }
    }
}
