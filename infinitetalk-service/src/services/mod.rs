pub mod asset_fetcher;
pub mod engines;
pub mod error;
pub mod generation;
pub mod metrics;

pub use asset_fetcher::AssetFetcher;
pub use engines::{EngineError, InferenceEngine, InferenceInput};
pub use error::GenerationError;
pub use generation::GenerationService;
pub use metrics::{get_metrics, init_metrics};
