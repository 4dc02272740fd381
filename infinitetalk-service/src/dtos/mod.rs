pub mod generate;

pub use generate::{InferenceRequest, InferenceResult, COMPLETION_MESSAGE, DEFAULT_CHECKPOINT};
