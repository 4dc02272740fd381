//! Generation pipeline: stage inputs, run the engine, report the output path.

use crate::config::WorkspaceConfig;
use crate::dtos::{InferenceRequest, InferenceResult, COMPLETION_MESSAGE};
use crate::models::{Job, JobStatus};
use crate::services::asset_fetcher::AssetFetcher;
use crate::services::engines::{InferenceEngine, InferenceInput};
use crate::services::error::GenerationError;
use crate::services::metrics::{
    ASSET_DOWNLOAD_BYTES_TOTAL, GENERATION_DURATION_SECONDS, GENERATION_REQUESTS_TOTAL,
};
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

#[derive(Clone)]
pub struct GenerationService {
    workspace: WorkspaceConfig,
    fetcher: AssetFetcher,
    engine: Arc<dyn InferenceEngine>,
}

impl GenerationService {
    pub fn new(
        workspace: WorkspaceConfig,
        fetcher: AssetFetcher,
        engine: Arc<dyn InferenceEngine>,
    ) -> Self {
        Self {
            workspace,
            fetcher,
            engine,
        }
    }

    pub fn engine(&self) -> &Arc<dyn InferenceEngine> {
        &self.engine
    }

    /// Run one request end to end.
    ///
    /// Steps run in order and nothing is rolled back: a failure leaves whatever was
    /// already staged on disk.
    pub async fn generate(
        &self,
        request: &InferenceRequest,
    ) -> Result<InferenceResult, GenerationError> {
        let started = Instant::now();
        let job = Job::new(&self.workspace);
        let span = tracing::info_span!("generation", job_id = %job.id);

        let outcome = self.run_job(&job, request).instrument(span).await;

        let label = match &outcome {
            Ok(()) => "completed",
            Err(e) => e.kind(),
        };
        counter!(GENERATION_REQUESTS_TOTAL, "outcome" => label).increment(1);
        histogram!(GENERATION_DURATION_SECONDS, "outcome" => label)
            .record(started.elapsed().as_secs_f64());

        match outcome {
            Ok(()) => {
                tracing::info!(
                    job_id = %job.id,
                    video_path = %job.output_path.display(),
                    "Generation completed"
                );
                Ok(InferenceResult {
                    status: JobStatus::Completed,
                    job_id: job.id.to_string(),
                    video_path: job.video_path(),
                    message: COMPLETION_MESSAGE.to_string(),
                })
            }
            Err(e) => {
                tracing::error!(job_id = %job.id, error = %e, kind = e.kind(), "Generation failed");
                Err(e)
            }
        }
    }

    async fn run_job(&self, job: &Job, request: &InferenceRequest) -> Result<(), GenerationError> {
        tokio::fs::create_dir_all(&job.staging_dir)
            .await
            .map_err(|e| GenerationError::storage(&job.staging_dir, e))?;
        tokio::fs::create_dir_all(&job.output_dir)
            .await
            .map_err(|e| GenerationError::storage(&job.output_dir, e))?;

        tracing::info!("Downloading assets");
        let image_bytes = self
            .fetcher
            .fetch_to(&request.image_url, &job.image_path)
            .await?;
        counter!(ASSET_DOWNLOAD_BYTES_TOTAL, "asset" => "image").increment(image_bytes);

        let audio_bytes = self
            .fetcher
            .fetch_to(&request.audio_url, &job.audio_path)
            .await?;
        counter!(ASSET_DOWNLOAD_BYTES_TOTAL, "asset" => "audio").increment(audio_bytes);

        tracing::info!(
            engine = self.engine.name(),
            checkpoint = %request.checkpoint_name,
            image_bytes,
            audio_bytes,
            "Running inference"
        );
        self.engine
            .run(InferenceInput {
                source_image: &job.image_path,
                driving_audio: &job.audio_path,
                checkpoint_name: &request.checkpoint_name,
                output_path: &job.output_path,
            })
            .await?;

        Ok(())
    }
}
