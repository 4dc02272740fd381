//! Inference engine abstractions and implementations.
//!
//! The generative model lives outside this service. Engines adapt it behind one trait so
//! the HTTP layer can run against a simulated backend, an external command, or a mock.

pub mod command;
pub mod mock;
pub mod simulated;

pub use command::CommandEngine;
pub use mock::MockEngine;
pub use simulated::SimulatedEngine;

use crate::config::{InferenceBackend, InferenceConfig};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Error type for engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Engine not configured: {0}")]
    NotConfigured(String),

    #[error("Failed to start inference process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Inference process I/O error: {0}")]
    Io(#[source] std::io::Error),

    #[error("Inference exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Inference timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Model(String),
}

/// Everything an engine needs to render one video.
#[derive(Debug, Clone, Copy)]
pub struct InferenceInput<'a> {
    /// Staged face image.
    pub source_image: &'a Path,

    /// Staged driving audio.
    pub driving_audio: &'a Path,

    /// Model checkpoint requested by the client.
    pub checkpoint_name: &'a str,

    /// Where the rendered video should be written.
    pub output_path: &'a Path,
}

/// Trait for talking-head video generators.
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Short identifier used in logs, metrics and the health endpoint.
    fn name(&self) -> &'static str;

    /// Render a video from the staged inputs.
    async fn run(&self, input: InferenceInput<'_>) -> Result<(), EngineError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), EngineError>;
}

/// Construct the engine selected by configuration.
pub fn from_config(config: &InferenceConfig) -> Result<Arc<dyn InferenceEngine>, EngineError> {
    match config.backend {
        InferenceBackend::Simulated => Ok(Arc::new(SimulatedEngine::new())),
        InferenceBackend::Command => {
            let command_line = config.command.as_deref().ok_or_else(|| {
                EngineError::NotConfigured("INFERENCE_COMMAND is not set".to_string())
            })?;
            Ok(Arc::new(CommandEngine::new(command_line, config.timeout())?))
        }
    }
}
