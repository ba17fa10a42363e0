// src/storage/checkpoint.rs

//! Checkpoint persistence.
//!
//! A single JSON file `{ "LAST_ID": <integer> }` holding the highest
//! listing id published in any prior successful run. Written only after
//! the publish phase reports success, so a crashed run leaves it
//! untouched and the next run re-derives the same diff.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// The maximum `internal_id` already published.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Checkpoint {
    #[serde(rename = "LAST_ID")]
    pub last_id: i64,
}

/// Read/write access to the checkpoint file.
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the checkpoint, seeding a missing file with `default_max_id`.
    ///
    /// Seeding with the batch's own maximum means a first-ever run treats
    /// everything as already seen and publishes nothing; this is the
    /// intended flood protection on initial deployment. A file that
    /// exists but fails to deserialize is fatal.
    pub async fn load(&self, default_max_id: i64) -> Result<Checkpoint> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!(
                    "No checkpoint at {}, seeding with batch max id {}",
                    self.path.display(),
                    default_max_id
                );
                Ok(Checkpoint {
                    last_id: default_max_id,
                })
            }
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Overwrite the checkpoint with a new maximum id.
    ///
    /// Write-then-rename so a crash mid-write cannot leave a truncated
    /// file behind.
    pub async fn save(&self, max_id: i64) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(&Checkpoint { last_id: max_id })?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;

        log::info!("Checkpoint advanced to {}", max_id);
        Ok(())
    }
}
