use crate::config::WorkspaceConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const IMAGE_FILE_NAME: &str = "input_face.jpg";
pub const AUDIO_FILE_NAME: &str = "input_audio.mp3";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Completed,
}

/// Filesystem footprint of one generation request.
///
/// Nothing here touches the disk; directories are created by the generation service.
/// Staged inputs and outputs are never removed by the service.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: Uuid,
    pub staging_dir: PathBuf,
    pub output_dir: PathBuf,
    pub image_path: PathBuf,
    pub audio_path: PathBuf,
    pub output_path: PathBuf,
}

impl Job {
    pub fn new(workspace: &WorkspaceConfig) -> Self {
        Self::with_id(Uuid::new_v4(), workspace)
    }

    pub fn with_id(id: Uuid, workspace: &WorkspaceConfig) -> Self {
        let staging_dir = workspace.staging_dir.join(id.to_string());
        Self {
            id,
            image_path: staging_dir.join(IMAGE_FILE_NAME),
            audio_path: staging_dir.join(AUDIO_FILE_NAME),
            output_path: workspace.output_dir.join(format!("{}.mp4", id)),
            output_dir: workspace.output_dir.clone(),
            staging_dir,
        }
    }

    /// Output path as reported to clients.
    pub fn video_path(&self) -> String {
        path_string(&self.output_path)
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
