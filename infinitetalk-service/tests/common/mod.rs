#![allow(dead_code)]

use infinitetalk_service::config::{
    DownloadConfig, InferenceBackend, InferenceConfig, TalkConfig, WorkspaceConfig,
};
use infinitetalk_service::services::engines::MockEngine;
use infinitetalk_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const FACE_BYTES: &[u8] = b"\xff\xd8\xff\xe0 fake jpeg payload";
pub const VOICE_BYTES: &[u8] = b"ID3 fake mp3 payload";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub root: PathBuf,
    pub engine: Arc<MockEngine>,
    pub client: reqwest::Client,
}

/// Configuration rooted in a fresh directory under `target/`.
pub fn test_config(root: &Path) -> TalkConfig {
    TalkConfig {
        common: CoreConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port for testing
        },
        workspace: WorkspaceConfig {
            staging_dir: root.join("temp"),
            output_dir: root.join("output"),
        },
        download: DownloadConfig {
            timeout_secs: Some(10),
            require_success_status: false,
            user_agent: "infinitetalk-service-tests".to_string(),
        },
        inference: InferenceConfig {
            backend: InferenceBackend::Simulated,
            command: None,
            timeout_secs: None,
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(MockEngine::new(), |_| {}).await
    }

    pub async fn spawn_with(engine: MockEngine, configure: impl FnOnce(&mut TalkConfig)) -> Self {
        let root = PathBuf::from(format!("target/test-workspace-{}", Uuid::new_v4()));
        let mut config = test_config(&root);
        configure(&mut config);

        let engine = Arc::new(engine);
        let app = Application::build_with_engine(config, engine.clone())
            .await
            .expect("Failed to build test application");

        Self::start(app, root, engine).await
    }

    /// Spawn an already built application.
    pub async fn start(app: Application, root: PathBuf, engine: Arc<MockEngine>) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            root,
            engine,
            client,
        }
    }

    pub async fn post_generate(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/generate", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub fn staging_dir(&self, job_id: &str) -> PathBuf {
        self.root.join("temp").join(job_id)
    }

    /// Remove everything the app wrote to disk.
    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.root).await;
    }
}

/// Serve `/face.jpg` and `/voice.mp3` with the given bodies.
pub async fn asset_server(face: &[u8], voice: &[u8]) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/face.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(face.to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/voice.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(voice.to_vec()))
        .mount(&server)
        .await;
    server
}

pub fn generate_body(server: &MockServer) -> serde_json::Value {
    serde_json::json!({
        "image_url": format!("{}/face.jpg", server.uri()),
        "audio_url": format!("{}/voice.mp3", server.uri()),
    })
}
