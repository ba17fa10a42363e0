// src/services/feed.rs

//! Feed retrieval service.
//!
//! Fetches the raw feed document and keeps a local snapshot of the exact
//! bytes for diagnostics. The snapshot is overwritten every run and is
//! never read back by the pipeline.

use std::path::PathBuf;

use reqwest::Client;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::FeedConfig;
use crate::utils::http;

/// Service that fetches the feed document.
pub struct FeedFetcher {
    client: Client,
    url: String,
    snapshot_path: PathBuf,
}

impl FeedFetcher {
    /// Create a fetcher for the configured endpoint, writing its snapshot
    /// under the given storage directory.
    pub fn new(config: &FeedConfig, storage_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            client: http::create_client(config)?,
            url: config.url.clone(),
            snapshot_path: storage_dir.into().join(&config.snapshot_file),
        })
    }

    /// Fetch the feed and return its decoded text.
    ///
    /// Network errors and non-success statuses propagate and abort the
    /// run; there is no retry here.
    pub async fn fetch(&self) -> Result<String> {
        let bytes = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        self.write_snapshot(&bytes).await?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Overwrite the snapshot atomically (write to temp, then rename).
    async fn write_snapshot(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.snapshot_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.snapshot_path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.snapshot_path).await?;

        log::debug!(
            "Feed snapshot written to {} ({} bytes)",
            self.snapshot_path.display(),
            bytes.len()
        );
        Ok(())
    }
}
