//! Asset fetcher for staging remote inputs on local disk.
//!
//! Downloads run on the async client and are streamed to disk chunk by chunk, so a slow
//! origin only suspends the request that is waiting on it.

use crate::config::DownloadConfig;
use crate::services::error::GenerationError;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Fetches asset URLs into staging files.
#[derive(Clone)]
pub struct AssetFetcher {
    client: reqwest::Client,
    require_success_status: bool,
}

impl AssetFetcher {
    /// Create a fetcher with one pooled client for all requests.
    pub fn new(config: &DownloadConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            require_success_status: config.require_success_status,
        })
    }

    /// GET `url` and write the body to `destination`, returning the bytes written.
    ///
    /// Non-2xx bodies are written too unless the fetcher requires success statuses.
    pub async fn fetch_to(&self, url: &str, destination: &Path) -> Result<u64, GenerationError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GenerationError::download(url, error_chain(e)))?;

        let status = response.status();
        if !status.is_success() {
            if self.require_success_status {
                return Err(GenerationError::download(
                    url,
                    format!("origin responded with HTTP {}", status),
                ));
            }
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                "Asset origin returned a non-success status; staging the body anyway"
            );
        }

        let mut file = File::create(destination)
            .await
            .map_err(|e| GenerationError::storage(destination, e))?;

        let mut written: u64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| GenerationError::download(url, error_chain(e)))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| GenerationError::storage(destination, e))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| GenerationError::storage(destination, e))?;

        tracing::debug!(
            url = %url,
            destination = %destination.display(),
            bytes = written,
            "Asset staged"
        );

        Ok(written)
    }
}

/// Renders the error with its causes, e.g. the DNS or connect failure behind
/// "error sending request".
fn error_chain(err: reqwest::Error) -> String {
    format!("{:#}", anyhow::Error::new(err))
}
