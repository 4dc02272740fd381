//! Simulated inference engine.
//!
//! Accepts every job and renders nothing, so `output/{job_id}.mp4` is not created. This is
//! the behaviour of a deployment that has not wired a model in yet.

use super::{EngineError, InferenceEngine, InferenceInput};
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct SimulatedEngine;

impl SimulatedEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InferenceEngine for SimulatedEngine {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn run(&self, input: InferenceInput<'_>) -> Result<(), EngineError> {
        tracing::info!(
            source_image = %input.source_image.display(),
            driving_audio = %input.driving_audio.display(),
            checkpoint = %input.checkpoint_name,
            output = %input.output_path.display(),
            "Running inference (simulated, no video is rendered)"
        );
        Ok(())
    }

    async fn health_check(&self) -> Result<(), EngineError> {
        Ok(())
    }
}
