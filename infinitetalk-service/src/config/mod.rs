use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct TalkConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub workspace: WorkspaceConfig,
    pub download: DownloadConfig,
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceConfig {
    /// Root of the per-job staging directories (`{staging_dir}/{job_id}/`).
    pub staging_dir: PathBuf,
    /// Shared directory receiving `{job_id}.mp4`.
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// Reject non-2xx asset responses instead of staging their bodies.
    pub require_success_status: bool,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    pub backend: InferenceBackend,
    /// Program and leading arguments for the command backend, whitespace separated.
    pub command: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InferenceBackend {
    Simulated,
    Command,
}

impl TalkConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let config = TalkConfig {
            common: common_config,
            workspace: WorkspaceConfig {
                staging_dir: get_env("STAGING_DIR", Some("temp"), is_prod)?.into(),
                output_dir: get_env("OUTPUT_DIR", Some("output"), is_prod)?.into(),
            },
            download: DownloadConfig {
                timeout_secs: parse_optional("DOWNLOAD_TIMEOUT_SECS")?,
                require_success_status: get_env("DOWNLOAD_REQUIRE_SUCCESS", Some("false"), false)?
                    .parse()
                    .map_err(|e| {
                        AppError::ConfigError(anyhow::anyhow!(
                            "DOWNLOAD_REQUIRE_SUCCESS must be true or false: {}",
                            e
                        ))
                    })?,
                user_agent: get_env(
                    "DOWNLOAD_USER_AGENT",
                    Some(concat!("infinitetalk-service/", env!("CARGO_PKG_VERSION"))),
                    false,
                )?,
            },
            inference: InferenceConfig {
                backend: get_env("INFERENCE_BACKEND", Some("simulated"), is_prod)?
                    .parse()
                    .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
                command: env::var("INFERENCE_COMMAND").ok(),
                timeout_secs: parse_optional("INFERENCE_TIMEOUT_SECS")?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Cross-field checks that cannot be expressed per key.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.inference.backend == InferenceBackend::Command
            && self
                .inference
                .command
                .as_deref()
                .map_or(true, |c| c.trim().is_empty())
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "INFERENCE_COMMAND is required when INFERENCE_BACKEND=command"
            )));
        }
        Ok(())
    }
}

impl DownloadConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl std::str::FromStr for InferenceBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simulated" => Ok(InferenceBackend::Simulated),
            "command" => Ok(InferenceBackend::Command),
            _ => Err(format!("Invalid inference backend: {}", s)),
        }
    }
}

fn parse_optional(key: &str) -> Result<Option<u64>, AppError> {
    match env::var(key) {
        Ok(val) => val.trim().parse().map(Some).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} must be a whole number of seconds: {}", key, e))
        }),
        Err(_) => Ok(None),
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
