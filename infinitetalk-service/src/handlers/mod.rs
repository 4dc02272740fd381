//! HTTP handlers for the InfiniteTalk service.

pub mod generate;
pub mod health;
pub mod metrics;

pub use generate::generate_video;
pub use health::{health_check, readiness_check};
pub use metrics::metrics_endpoint;
