//! Application startup and lifecycle management.

use crate::config::TalkConfig;
use crate::handlers;
use crate::services::{engines, AssetFetcher, GenerationService, InferenceEngine};
use axum::{
    body::Body,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: TalkConfig,
    pub generation: GenerationService,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/generate", post(handlers::generate_video))
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the engine selected by configuration.
    pub async fn build(config: TalkConfig) -> Result<Self, AppError> {
        let engine = engines::from_config(&config.inference).map_err(|e| {
            tracing::error!("Failed to initialize inference engine: {}", e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;

        Self::build_with_engine(config, engine).await
    }

    /// Build the application around an explicit engine.
    pub async fn build_with_engine(
        config: TalkConfig,
        engine: Arc<dyn InferenceEngine>,
    ) -> Result<Self, AppError> {
        let fetcher = AssetFetcher::new(&config.download).map_err(|e| {
            tracing::error!("Failed to build download client: {}", e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;

        tracing::info!(
            engine = engine.name(),
            staging_dir = %config.workspace.staging_dir.display(),
            output_dir = %config.workspace.output_dir.display(),
            "Initialized generation service"
        );

        let generation = GenerationService::new(config.workspace.clone(), fetcher, engine);
        let state = AppState {
            config: config.clone(),
            generation,
        };

        // Port 0 binds a random port for testing
        let (host, port) = config.common.listen_target();
        let listener = TcpListener::bind((host, port)).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}:{}: {}", host, port, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}:{}", config.common.host, port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
