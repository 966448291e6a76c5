//! Processing service coordinating registration, transfer, and reconciliation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{
    processing::{
        content_type::derive_content_type,
        matcher::find_by_name,
        poller::{PollOutcome, PollPolicy, Sleeper, TokioSleeper, poll_for_artifact},
        types::{UploadError, UploadOptions, UploadOutcome},
    },
    remote::{ArtifactRecord, DocumentBackend, RemoteError, UploadRequest},
};

/// Drives uploads through the backend and answers listing queries.
///
/// Holds no per-upload state: every call re-fetches what it needs, so one instance can be
/// shared through an `Arc` and serve independent invocations concurrently.
pub struct ProcessingService {
    backend: Arc<dyn DocumentBackend>,
    sleeper: Arc<dyn Sleeper>,
    policy: PollPolicy,
}

impl ProcessingService {
    /// Build a service over `backend` with the default polling policy and real timers.
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            backend,
            sleeper: Arc::new(TokioSleeper),
            policy: PollPolicy::default(),
        }
    }

    /// Replace the sleeper and polling policy used for reconciliation.
    pub fn with_polling(mut self, sleeper: Arc<dyn Sleeper>, policy: PollPolicy) -> Self {
        self.sleeper = sleeper;
        self.policy = policy;
        self
    }

    /// Upload a local file and wait (bounded) for the backend to finish processing it.
    ///
    /// Registration strictly precedes transfer, which strictly precedes the first poll tick.
    /// Any failure aborts the remaining steps. Running out of poll ticks is not a failure and
    /// yields [`UploadOutcome::Pending`].
    pub async fn upload_and_process(
        &self,
        local_path: &Path,
        options: UploadOptions,
    ) -> Result<UploadOutcome, UploadError> {
        let file_name = validate_local_file(local_path).await?;
        let content_type = derive_content_type(local_path);
        tracing::info!(
            path = %local_path.display(),
            file_name = %file_name,
            content_type,
            "Uploading document"
        );

        let request = UploadRequest {
            file_name: file_name.clone(),
            content_type: content_type.to_string(),
            split_pages: options.split_pages,
            lock_schema: options.lock_schema,
        };
        let ticket = self.backend.register_upload(&request).await?;

        let content = tokio::fs::read(local_path)
            .await
            .map_err(|source| UploadError::ReadFile {
                path: local_path.to_path_buf(),
                source,
            })?;
        self.backend
            .transfer_binary(&ticket, content, content_type)
            .await?;
        tracing::info!(upload_id = %ticket.upload_id, "Upload transferred; waiting for processing");

        let outcome = poll_for_artifact(
            self.backend.as_ref(),
            self.sleeper.as_ref(),
            &self.policy,
            &file_name,
            &ticket,
        )
        .await?;

        Ok(match outcome {
            PollOutcome::Processed { record, .. } => UploadOutcome::Resolved {
                upload_id: ticket.upload_id,
                record,
            },
            PollOutcome::Exhausted { .. } => UploadOutcome::Pending {
                upload_id: ticket.upload_id,
                file_name,
            },
        })
    }

    /// Fetch the current artifact listing.
    pub async fn list_artifacts(&self) -> Result<Vec<ArtifactRecord>, RemoteError> {
        self.backend.list_artifacts().await
    }

    /// Find the first artifact whose name contains `query` (case-insensitive).
    pub async fn find_artifact(&self, query: &str) -> Result<Option<ArtifactRecord>, RemoteError> {
        let records = self.backend.list_artifacts().await?;
        Ok(find_by_name(&records, query).cloned())
    }
}

/// Confirm the path names a readable regular file and return its file name.
async fn validate_local_file(path: &Path) -> Result<String, UploadError> {
    let not_found = || UploadError::FileNotFound {
        path: PathBuf::from(path),
    };

    let metadata = tokio::fs::metadata(path).await.map_err(|_| not_found())?;
    if !metadata.is_file() {
        return Err(not_found());
    }
    tokio::fs::File::open(path).await.map_err(|_| not_found())?;

    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(not_found)
}
