use crate::models::JobStatus;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

pub const DEFAULT_CHECKPOINT: &str = "default";

pub const COMPLETION_MESSAGE: &str =
    "Video generated successfully. Please sync to cloud storage in production.";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InferenceRequest {
    #[validate(url(message = "image_url must be an absolute URL"))]
    pub image_url: String,

    #[validate(url(message = "audio_url must be an absolute URL"))]
    pub audio_url: String,

    #[serde(
        default = "default_checkpoint",
        deserialize_with = "checkpoint_or_default"
    )]
    #[validate(length(
        min = 1,
        max = 128,
        message = "checkpoint_name must be 1-128 characters"
    ))]
    pub checkpoint_name: String,
}

fn default_checkpoint() -> String {
    DEFAULT_CHECKPOINT.to_string()
}

/// An explicit `null` falls back to the default checkpoint, same as an absent key.
fn checkpoint_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_checkpoint))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResult {
    pub status: JobStatus,
    pub job_id: String,
    pub video_path: String,
    pub message: String,
}
