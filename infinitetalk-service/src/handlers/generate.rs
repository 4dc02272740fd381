use crate::dtos::{InferenceRequest, InferenceResult};
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;

/// `POST /generate`: stage the face image and driving audio, then run inference.
pub async fn generate_video(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<InferenceRequest>,
) -> Result<Json<InferenceResult>, AppError> {
    let result = state.generation.generate(&request).await?;
    Ok(Json(result))
}
