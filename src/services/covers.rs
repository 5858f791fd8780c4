// SPDX-License-Identifier: MIT

//! Cover image storage.
//!
//! Uploads are buffered in memory at parse time and only written to
//! disk once the owning operation's checks have passed. Removal is
//! best-effort: a record update is never blocked by file cleanup.

use crate::error::AppError;
use crate::models::book::DEFAULT_COVER;
use std::path::{Path, PathBuf};

/// Maximum accepted cover size (5 MB).
pub const MAX_COVER_BYTES: usize = 5 * 1024 * 1024;

/// An uploaded cover image, validated but not yet persisted.
#[derive(Debug, Clone)]
pub struct CoverUpload {
    pub bytes: Vec<u8>,
    /// Extension derived from the image content type (e.g. "png")
    pub extension: String,
}

/// Filesystem store for cover images.
#[derive(Debug, Clone)]
pub struct CoverStore {
    root: PathBuf,
}

impl CoverStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory covers are written to; also the ServeDir root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an upload under a generated time-based filename and
    /// return that filename.
    pub async fn store(&self, upload: &CoverUpload) -> Result<String, AppError> {
        let filename = format!(
            "cover-{}.{}",
            chrono::Utc::now().timestamp_millis(),
            upload.extension
        );

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Creating uploads dir: {}", e)))?;
        tokio::fs::write(self.root.join(&filename), &upload.bytes)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Writing cover file: {}", e)))?;

        tracing::debug!(filename = %filename, size = upload.bytes.len(), "Stored cover image");

        Ok(filename)
    }

    /// Remove a previously stored cover. The shared placeholder is
    /// never deleted; failures are logged and swallowed.
    pub async fn remove(&self, filename: &str) {
        if filename == DEFAULT_COVER {
            return;
        }
        // Stored filenames are generated; anything with a path
        // separator did not come from this store.
        if filename.contains(['/', '\\']) {
            tracing::warn!(filename = %filename, "Refusing to remove cover outside store");
            return;
        }

        match tokio::fs::remove_file(self.root.join(filename)).await {
            Ok(()) => tracing::debug!(filename = %filename, "Removed old cover image"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(filename = %filename, error = %e, "Failed to remove cover image");
            }
        }
    }
}
