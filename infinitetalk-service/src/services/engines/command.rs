//! External-process inference engine.
//!
//! Runs a model entry point such as `python inference.py` once per job, appending
//! `--face <image> --audio <audio> --output <video> --checkpoint <name>`.

use super::{EngineError, InferenceEngine, InferenceInput};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Bytes of stderr kept in a failure message.
const STDERR_TAIL_BYTES: usize = 2048;

#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandEngine {
    /// Build from a whitespace separated command line, e.g. `python inference.py`.
    pub fn new(command_line: &str, timeout: Option<Duration>) -> Result<Self, EngineError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or_else(|| {
            EngineError::NotConfigured("inference command is empty".to_string())
        })?;

        Ok(Self {
            program,
            args: parts.collect(),
            timeout,
        })
    }

    fn command(&self, input: &InferenceInput<'_>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("--face")
            .arg(input.source_image)
            .arg("--audio")
            .arg(input.driving_audio)
            .arg("--output")
            .arg(input.output_path)
            .arg("--checkpoint")
            .arg(input.checkpoint_name)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl InferenceEngine for CommandEngine {
    fn name(&self) -> &'static str {
        "command"
    }

    async fn run(&self, input: InferenceInput<'_>) -> Result<(), EngineError> {
        tracing::info!(
            program = %self.program,
            checkpoint = %input.checkpoint_name,
            output = %input.output_path.display(),
            "Starting inference process"
        );

        let child = self.command(&input).spawn().map_err(EngineError::Spawn)?;
        let wait = child.wait_with_output();

        // Dropping the wait future on timeout kills the child (kill_on_drop).
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, wait)
                .await
                .map_err(|_| EngineError::Timeout(limit))?,
            None => wait.await,
        }
        .map_err(EngineError::Io)?;

        if !output.stdout.is_empty() {
            tracing::debug!(
                stdout = %tail(&output.stdout, STDERR_TAIL_BYTES),
                "Inference process output"
            );
        }

        if output.status.success() {
            Ok(())
        } else {
            Err(EngineError::Failed {
                status: output.status.to_string(),
                stderr: tail(&output.stderr, STDERR_TAIL_BYTES),
            })
        }
    }

    async fn health_check(&self) -> Result<(), EngineError> {
        let program = Path::new(&self.program);
        if program.components().count() > 1 && !program.exists() {
            return Err(EngineError::NotConfigured(format!(
                "inference program not found: {}",
                self.program
            )));
        }
        Ok(())
    }
}

fn tail(bytes: &[u8], limit: usize) -> String {
    let start = bytes.len().saturating_sub(limit);
    String::from_utf8_lossy(&bytes[start..]).trim().to_string()
}
