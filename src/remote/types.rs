//! Shared types used by the backend client and the processing pipeline.

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors returned while interacting with the document backend.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Base URL or pre-signed target failed to parse.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Upload registration was rejected.
    #[error("Upload registration failed ({status}): {body}")]
    Registration {
        /// HTTP status returned by the backend.
        status: StatusCode,
        /// Raw response body kept for diagnostics.
        body: String,
    },
    /// Binary transfer to the pre-signed target was rejected.
    #[error("File transfer failed ({status})")]
    Transfer {
        /// HTTP status returned by the storage target.
        status: StatusCode,
    },
    /// Artifact listing request was rejected.
    #[error("Failed to list files ({status}): {status_text}")]
    List {
        /// HTTP status returned by the backend.
        status: StatusCode,
        /// Canonical reason phrase for the status.
        status_text: String,
    },
    /// Response body did not match the expected shape.
    #[error("Unexpected backend response: {0}")]
    Decode(String),
}

/// Metadata describing one file to register with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// File name (no directories) as it should appear in the backend.
    pub file_name: String,
    /// MIME type derived from the file extension.
    pub content_type: String,
    /// Ask the backend to split multi-page documents.
    pub split_pages: bool,
    /// Ask the backend to keep the detected schema fixed.
    pub lock_schema: bool,
}

/// Registration response correlating a local upload with a backend identifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTicket {
    /// Backend-assigned identifier; the authoritative correlation key.
    pub upload_id: String,
    /// Pre-signed URL that receives the raw file bytes.
    #[serde(alias = "uploadUrl")]
    pub presigned_url: String,
}

/// Processing state reported for an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactStatus {
    /// Processing finished; the record is terminally resolved.
    Processed,
    /// Still in flight. Any status the backend reports other than `processed` lands here.
    #[default]
    #[serde(other)]
    Pending,
}

impl ArtifactStatus {
    /// Lowercase label used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processed => "processed",
        }
    }
}

/// The backend's view of one uploaded document.
///
/// Optional fields stay optional here; fallbacks like "Unknown" belong to the report layer.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRecord {
    /// Backend file identifier.
    #[serde(default)]
    pub file_id: Option<String>,
    /// Upload identifier issued at registration.
    #[serde(default)]
    pub upload_id: Option<String>,
    /// Stored file name, possibly transformed by the backend.
    pub file_name: String,
    /// Processing state.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ArtifactStatus,
    /// Document classification.
    #[serde(default)]
    pub file_class: Option<String>,
    /// Organization the document was attributed to.
    #[serde(default, alias = "organizationName")]
    pub owner_organization_name: Option<String>,
    /// AI-generated summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Stored size in bytes.
    #[serde(default, alias = "fileSize")]
    pub file_size_bytes: Option<u64>,
    /// Creation timestamp as reported by the backend.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp as reported by the backend.
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Extraction schema identifier.
    #[serde(default)]
    pub schema_id: Option<String>,
    /// Caller-visible reference identifier.
    #[serde(default)]
    pub reference_id: Option<String>,
    /// Whether the backend flagged the file as a duplicate.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_duplicate: bool,
    /// Content hash computed by the backend.
    #[serde(default)]
    pub content_hash: Option<String>,
    /// Storage location inside the backend.
    #[serde(default)]
    pub storage_path: Option<String>,
}

impl ArtifactRecord {
    /// Whether the record has reached its terminal state.
    pub fn is_processed(&self) -> bool {
        self.status == ArtifactStatus::Processed
    }
}

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Deserialize)]
pub(crate) struct ListFilesResponse {
    #[serde(default)]
    pub(crate) files: Option<Vec<ArtifactRecord>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_decodes_with_sparse_fields() {
        let record: ArtifactRecord = serde_json::from_value(json!({
            "fileName": "invoice_final.pdf",
            "uploadId": "u1",
            "status": "processed",
            "organizationName": "Acme",
            "fileSize": 2048
        }))
        .expect("record");

        assert!(record.is_processed());
        assert_eq!(record.upload_id.as_deref(), Some("u1"));
        assert_eq!(record.owner_organization_name.as_deref(), Some("Acme"));
        assert_eq!(record.file_size_bytes, Some(2048));
        assert!(record.summary.is_none());
        assert!(!record.is_duplicate);
    }

    #[test]
    fn unknown_status_is_pending() {
        let record: ArtifactRecord = serde_json::from_value(json!({
            "fileName": "scan.png",
            "status": "classifying"
        }))
        .expect("record");
        assert_eq!(record.status, ArtifactStatus::Pending);
    }

    #[test]
    fn listing_tolerates_null_status_and_duplicate_flag() {
        let payload: ListFilesResponse = serde_json::from_value(json!({
            "files": [
                { "fileName": "invoice_final.pdf", "status": "processed", "isDuplicate": false },
                { "fileName": "scan.png", "status": null, "isDuplicate": null, "summary": null }
            ]
        }))
        .expect("listing");

        let files = payload.files.expect("files");
        assert_eq!(files.len(), 2);
        assert!(files[0].is_processed());
        assert_eq!(files[1].status, ArtifactStatus::Pending);
        assert!(!files[1].is_duplicate);
        assert!(files[1].summary.is_none());
    }

    #[test]
    fn status_round_trips_as_lowercase() {
        assert_eq!(
            serde_json::to_value(ArtifactStatus::Processed).expect("status"),
            json!("processed")
        );
        let status: ArtifactStatus = serde_json::from_value(json!("processed")).expect("status");
        assert_eq!(status, ArtifactStatus::Processed);
    }

    #[test]
    fn ticket_accepts_upload_url_alias() {
        let ticket: UploadTicket = serde_json::from_value(json!({
            "uploadId": "u9",
            "uploadUrl": "https://storage.example/u9"
        }))
        .expect("ticket");
        assert_eq!(ticket.presigned_url, "https://storage.example/u9");
    }
}
