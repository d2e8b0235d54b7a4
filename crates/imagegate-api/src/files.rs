//! Generated image storage: listing and batch deletion.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File extensions treated as images by [`ImageStore::list`].
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// Why a single file in a batch was not deleted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteFailure {
    /// Name contains `..`, `/` or `\`; the filesystem was not touched.
    #[error("Invalid filename.")]
    InvalidFilename,
    /// Nothing to delete at that path.
    #[error("File not found.")]
    NotFound,
    /// Permissions or any other I/O failure.
    #[error("Failed to delete file.")]
    Failed,
}

/// Per-file outcome of a deletion batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionResult {
    /// The filename as the client sent it.
    pub filename: String,
    /// Whether the file was removed.
    pub success: bool,
    /// Failure message when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeletionResult {
    fn from_outcome(filename: &str, outcome: Result<(), DeleteFailure>) -> Self {
        match outcome {
            Ok(()) => Self {
                filename: filename.to_string(),
                success: true,
                error: None,
            },
            Err(failure) => Self {
                filename: filename.to_string(),
                success: false,
                error: Some(failure.to_string()),
            },
        }
    }
}

/// One image in the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    /// File name relative to the output directory.
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification, seconds since the Unix epoch.
    pub modified: u64,
}

/// Whether a client-supplied name is safe to join onto the output directory.
///
/// `..`, `/` and `\` are the only traversal signals checked.
pub fn is_safe_filename(filename: &str) -> bool {
    !(filename.contains("..") || filename.contains('/') || filename.contains('\\'))
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// The directory generated images are written to.
#[derive(Debug, Clone)]
pub struct ImageStore {
    output_dir: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// The root directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Delete a single file. Validation happens before any filesystem access.
    pub async fn delete(&self, filename: &str) -> Result<(), DeleteFailure> {
        if !is_safe_filename(filename) {
            return Err(DeleteFailure::InvalidFilename);
        }

        let path = self.output_dir.join(filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(DeleteFailure::NotFound),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to delete file");
                Err(DeleteFailure::Failed)
            }
        }
    }

    /// Delete every file in order. A failure never stops the batch and
    /// nothing is rolled back.
    pub async fn delete_all(&self, filenames: &[String]) -> Vec<DeletionResult> {
        let mut results = Vec::with_capacity(filenames.len());
        for filename in filenames {
            let outcome = self.delete(filename).await;
            match &outcome {
                Ok(()) => tracing::info!(filename = %filename, "Deleted file"),
                Err(failure) => {
                    tracing::warn!(filename = %filename, reason = %failure, "File not deleted")
                }
            }
            results.push(DeletionResult::from_outcome(filename, outcome));
        }
        results
    }

    /// List images, newest first. A missing directory is an empty listing.
    pub async fn list(&self) -> std::io::Result<Vec<ImageEntry>> {
        let mut dir = match tokio::fs::read_dir(&self.output_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut images = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if !is_image(&path) {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs())
                .unwrap_or(0);
            images.push(ImageEntry {
                filename: entry.file_name().to_string_lossy().into_owned(),
                size: metadata.len(),
                modified,
            });
        }

        images.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| a.filename.cmp(&b.filename))
        });
        Ok(images)
    }
}
