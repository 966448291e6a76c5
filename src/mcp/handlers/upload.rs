//! Handler for the `upload_and_process` tool.

use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    mcp::format::upload_report,
    processing::{ProcessingService, UploadOptions},
};
use rmcp::model::JsonObject;
use serde::Deserialize;

use super::{ToolError, parse_arguments};

/// Request payload accepted by the `upload_and_process` tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct UploadToolRequest {
    /// Path of the local file to upload.
    pub(crate) file_path: String,
    /// Optional page-splitting flag.
    #[serde(default)]
    pub(crate) split_pages: bool,
    /// Optional schema-locking flag.
    #[serde(default)]
    pub(crate) lock_schema: bool,
}

/// Handle `upload_and_process` by uploading the file and waiting for the backend result.
pub(crate) async fn handle_upload(
    processing: &Arc<ProcessingService>,
    arguments: Option<JsonObject>,
) -> Result<String, ToolError> {
    let args: UploadToolRequest = parse_arguments(arguments)?;
    let file_path = args.file_path.trim();
    if file_path.is_empty() {
        return Err(ToolError::InvalidArguments(
            "`filePath` must not be empty".into(),
        ));
    }

    let options = UploadOptions {
        split_pages: args.split_pages,
        lock_schema: args.lock_schema,
    };
    let outcome = processing
        .upload_and_process(&PathBuf::from(file_path), options)
        .await?;
    Ok(upload_report(&outcome))
}
