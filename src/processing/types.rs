//! Outcome and error types for the upload pipeline.

use std::path::PathBuf;

use crate::remote::{ArtifactRecord, RemoteError};
use thiserror::Error;

/// Errors that abort an upload-and-process operation.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The local path does not exist, is not a regular file, or cannot be opened.
    #[error("File not found or not readable: {}", path.display())]
    FileNotFound {
        /// Path supplied by the caller.
        path: PathBuf,
    },
    /// The file vanished or became unreadable between validation and transfer.
    #[error("Failed to read {}: {source}", path.display())]
    ReadFile {
        /// Path supplied by the caller.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A backend call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Caller-selected processing flags forwarded at registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Split multi-page documents into separate artifacts.
    pub split_pages: bool,
    /// Keep the detected extraction schema fixed.
    pub lock_schema: bool,
}

/// Successful result of an upload-and-process operation.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// The backend finished processing and the artifact was located.
    Resolved {
        /// Upload identifier issued at registration.
        upload_id: String,
        /// Full artifact metadata.
        record: ArtifactRecord,
    },
    /// The file was submitted but processing had not finished within the polling budget.
    Pending {
        /// Upload identifier issued at registration.
        upload_id: String,
        /// Local file name that was submitted.
        file_name: String,
    },
}

impl UploadOutcome {
    /// Upload identifier for either outcome.
    pub fn upload_id(&self) -> &str {
        match self {
            Self::Resolved { upload_id, .. } | Self::Pending { upload_id, .. } => upload_id,
        }
    }
}
