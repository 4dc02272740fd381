//! Mock engine implementation for testing.

use super::{EngineError, InferenceEngine, InferenceInput};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;

/// Placeholder bytes written to the output path by a succeeding mock.
pub const MOCK_VIDEO_BYTES: &[u8] = b"mock-mp4";

/// One recorded call to [`MockEngine::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRun {
    pub source_image: PathBuf,
    pub driving_audio: PathBuf,
    pub checkpoint_name: String,
    pub output_path: PathBuf,
}

/// Mock engine for testing.
pub struct MockEngine {
    failure: Option<String>,
    runs: Mutex<Vec<RecordedRun>>,
}

impl MockEngine {
    /// Engine that writes [`MOCK_VIDEO_BYTES`] to the output path.
    pub fn new() -> Self {
        Self {
            failure: None,
            runs: Mutex::new(Vec::new()),
        }
    }

    /// Engine whose every run fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            runs: Mutex::new(Vec::new()),
        }
    }

    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceEngine for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn run(&self, input: InferenceInput<'_>) -> Result<(), EngineError> {
        self.runs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedRun {
                source_image: input.source_image.to_path_buf(),
                driving_audio: input.driving_audio.to_path_buf(),
                checkpoint_name: input.checkpoint_name.to_string(),
                output_path: input.output_path.to_path_buf(),
            });

        if let Some(message) = &self.failure {
            return Err(EngineError::Model(message.clone()));
        }

        tokio::fs::write(input.output_path, MOCK_VIDEO_BYTES)
            .await
            .map_err(|e| EngineError::Model(format!("mock could not write output: {}", e)))
    }

    async fn health_check(&self) -> Result<(), EngineError> {
        match &self.failure {
            None => Ok(()),
            Some(message) => Err(EngineError::Model(message.clone())),
        }
    }
}
