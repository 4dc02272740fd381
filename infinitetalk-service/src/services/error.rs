use crate::services::engines::EngineError;
use service_core::error::AppError;
use std::path::PathBuf;
use thiserror::Error;

/// Why a generation request failed.
///
/// Every variant keeps the underlying message; the HTTP layer reports all of them as 500.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Failed to download {url}: {message}")]
    Download { url: String, message: String },

    #[error("Storage error at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Inference failed: {0}")]
    Inference(#[from] EngineError),
}

impl GenerationError {
    pub fn download(url: &str, message: impl Into<String>) -> Self {
        GenerationError::Download {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerationError::Storage {
            path: path.into(),
            source,
        }
    }

    /// Metric label for the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Download { .. } => "download_error",
            GenerationError::Storage { .. } => "storage_error",
            GenerationError::Inference(_) => "inference_error",
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}
