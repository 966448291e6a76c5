//! HTTP client wrapper for the document-processing backend.

use crate::config::Config;
use crate::remote::types::{
    ArtifactRecord, ListFilesResponse, RemoteError, UploadRequest, UploadTicket,
};
use async_trait::async_trait;
use reqwest::{Client, Method, header::CONTENT_TYPE};

const API_KEY_HEADER: &str = "x-api-key";

/// Remote operations the upload pipeline depends on.
///
/// Implemented by [`RemoteClient`] for the real backend; tests substitute scripted sources.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Register an upload and obtain its ticket.
    async fn register_upload(&self, request: &UploadRequest) -> Result<UploadTicket, RemoteError>;

    /// Send the raw file bytes to the ticket's pre-signed target.
    async fn transfer_binary(
        &self,
        ticket: &UploadTicket,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), RemoteError>;

    /// Fetch the full current artifact listing.
    async fn list_artifacts(&self) -> Result<Vec<ArtifactRecord>, RemoteError>;
}

/// Lightweight HTTP client for backend operations.
pub struct RemoteClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
}

impl RemoteClient {
    /// Construct a new client from the loaded configuration.
    pub fn new(config: &Config) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .user_agent(concat!("docbridge/", env!("CARGO_PKG_VERSION")))
            .timeout(config.http_timeout)
            .build()?;

        let base_url = normalize_base_url(&config.api_url).map_err(RemoteError::InvalidUrl)?;
        tracing::debug!(
            url = %base_url,
            has_api_key = config.api_key.is_some(),
            timeout_secs = config.http_timeout.as_secs(),
            "Initialized backend HTTP client"
        );

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.request(method, url);
        if let Some(api_key) = &self.api_key
            && !api_key.is_empty()
        {
            req = req.header(API_KEY_HEADER, api_key);
        }
        req
    }

    fn endpoint(&self, path: &str) -> String {
        format_endpoint(&self.base_url, path)
    }
}

#[async_trait]
impl DocumentBackend for RemoteClient {
    async fn register_upload(&self, request: &UploadRequest) -> Result<UploadTicket, RemoteError> {
        let response = self
            .request(Method::POST, &self.endpoint("uploads"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = RemoteError::Registration { status, body };
            tracing::error!(file_name = %request.file_name, error = %error, "Upload registration failed");
            return Err(error);
        }

        let body = response.text().await?;
        let ticket: UploadTicket = serde_json::from_str(&body)
            .map_err(|err| RemoteError::Decode(format!("registration response: {err}")))?;
        reqwest::Url::parse(&ticket.presigned_url)
            .map_err(|err| RemoteError::InvalidUrl(format!("{}: {err}", ticket.presigned_url)))?;
        tracing::debug!(
            file_name = %request.file_name,
            upload_id = %ticket.upload_id,
            "Upload registered"
        );
        Ok(ticket)
    }

    async fn transfer_binary(
        &self,
        ticket: &UploadTicket,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), RemoteError> {
        let size = content.len();
        // The pre-signed URL carries its own authorization; the backend key stays off it.
        let response = self
            .client
            .put(&ticket.presigned_url)
            .header(CONTENT_TYPE, content_type)
            .body(content)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error = RemoteError::Transfer { status };
            tracing::error!(upload_id = %ticket.upload_id, error = %error, "File transfer failed");
            return Err(error);
        }

        tracing::debug!(upload_id = %ticket.upload_id, bytes = size, "File transferred");
        Ok(())
    }

    async fn list_artifacts(&self) -> Result<Vec<ArtifactRecord>, RemoteError> {
        let response = self
            .request(Method::GET, &self.endpoint("files"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error = RemoteError::List {
                status,
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            };
            tracing::error!(error = %error, "Failed to list files");
            return Err(error);
        }

        let body = response.text().await?;
        let payload: ListFilesResponse = serde_json::from_str(&body)
            .map_err(|err| RemoteError::Decode(format!("file listing: {err}")))?;
        Ok(payload.files.unwrap_or_default())
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

fn format_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::ArtifactStatus;
    use httpmock::{
        Method::{GET, POST, PUT},
        MockServer,
    };
    use reqwest::StatusCode;
    use serde_json::json;

    fn client_for(server: &MockServer, api_key: Option<&str>) -> RemoteClient {
        RemoteClient {
            client: Client::builder()
                .user_agent("docbridge-test")
                .build()
                .expect("client"),
            base_url: server.base_url(),
            api_key: api_key.map(str::to_string),
        }
    }

    fn pdf_request() -> UploadRequest {
        UploadRequest {
            file_name: "invoice.pdf".into(),
            content_type: "application/pdf".into(),
            split_pages: false,
            lock_schema: true,
        }
    }

    #[tokio::test]
    async fn register_upload_sends_metadata_and_key() {
        let server = MockServer::start_async().await;
        let presigned = server.url("/storage/u1");
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/uploads")
                    .header(API_KEY_HEADER, "secret")
                    .json_body(json!({
                        "fileName": "invoice.pdf",
                        "contentType": "application/pdf",
                        "splitPages": false,
                        "lockSchema": true
                    }));
                then.status(200)
                    .json_body(json!({ "uploadId": "u1", "presignedUrl": presigned }));
            })
            .await;

        let client = client_for(&server, Some("secret"));
        let ticket = client
            .register_upload(&pdf_request())
            .await
            .expect("ticket");

        mock.assert_async().await;
        assert_eq!(ticket.upload_id, "u1");
        assert!(ticket.presigned_url.ends_with("/storage/u1"));
    }

    #[tokio::test]
    async fn requests_without_api_key_omit_the_header() {
        let server = MockServer::start_async().await;
        let presigned = server.url("/storage/u2");
        let register = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/uploads")
                    .header_missing(API_KEY_HEADER);
                then.status(200)
                    .json_body(json!({ "uploadId": "u2", "presignedUrl": presigned }));
            })
            .await;
        let listing = server
            .mock_async(|when, then| {
                when.method(GET).path("/files").header_missing(API_KEY_HEADER);
                then.status(200).json_body(json!({ "files": [] }));
            })
            .await;

        let client = client_for(&server, None);
        let ticket = client
            .register_upload(&pdf_request())
            .await
            .expect("ticket");
        let records = client.list_artifacts().await.expect("listing");

        register.assert_async().await;
        listing.assert_async().await;
        assert_eq!(ticket.upload_id, "u2");
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn register_upload_surfaces_status_and_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/uploads");
                then.status(403).body("invalid api key");
            })
            .await;

        let client = client_for(&server, None);
        let err = client
            .register_upload(&pdf_request())
            .await
            .expect_err("registration should fail");

        match err {
            RemoteError::Registration { status, body } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("expected registration error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transfer_binary_puts_raw_bytes() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/storage/u1")
                    .header("content-type", "application/pdf")
                    .header_missing(API_KEY_HEADER)
                    .body("%PDF-1.7");
                then.status(200);
            })
            .await;

        let client = client_for(&server, Some("secret"));
        let ticket = UploadTicket {
            upload_id: "u1".into(),
            presigned_url: server.url("/storage/u1"),
        };
        client
            .transfer_binary(&ticket, b"%PDF-1.7".to_vec(), "application/pdf")
            .await
            .expect("transfer");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn transfer_binary_maps_failure_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/storage/u1");
                then.status(500);
            })
            .await;

        let client = client_for(&server, None);
        let ticket = UploadTicket {
            upload_id: "u1".into(),
            presigned_url: server.url("/storage/u1"),
        };
        let err = client
            .transfer_binary(&ticket, vec![1, 2, 3], "application/octet-stream")
            .await
            .expect_err("transfer should fail");
        assert!(matches!(
            err,
            RemoteError::Transfer { status } if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[tokio::test]
    async fn list_artifacts_decodes_records() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/files");
                then.status(200).json_body(json!({
                    "files": [
                        { "fileName": "invoice_final.pdf", "uploadId": "u1", "status": "processed" },
                        { "fileName": "notes.txt", "status": "pending" }
                    ]
                }));
            })
            .await;

        let records = client_for(&server, None)
            .list_artifacts()
            .await
            .expect("listing");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, ArtifactStatus::Processed);
        assert_eq!(records[1].status, ArtifactStatus::Pending);
    }

    #[tokio::test]
    async fn list_artifacts_treats_missing_files_as_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/files");
                then.status(200).json_body(json!({ "files": null }));
            })
            .await;

        let records = client_for(&server, None)
            .list_artifacts()
            .await
            .expect("listing");
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn list_artifacts_reports_status_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/files");
                then.status(401);
            })
            .await;

        let err = client_for(&server, None)
            .list_artifacts()
            .await
            .expect_err("listing should fail");
        match err {
            RemoteError::List {
                status,
                status_text,
            } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(status_text, "Unauthorized");
            }
            other => panic!("expected list error, got {other:?}"),
        }
    }

    #[test]
    fn endpoint_joins_without_duplicate_slashes() {
        assert_eq!(
            format_endpoint("https://api.example/v1/", "/files"),
            "https://api.example/v1/files"
        );
        assert_eq!(
            normalize_base_url("https://api.example/v1/").expect("url"),
            "https://api.example/v1"
        );
    }
}
