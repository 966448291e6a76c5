//! Handlers for the listing and lookup tools.

use std::sync::Arc;

use crate::{
    mcp::format::{details_report, list_report},
    processing::ProcessingService,
};
use rmcp::model::JsonObject;
use serde::Deserialize;

use super::{ToolError, parse_arguments};

/// Request payload for the `get_file_details` tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct FileDetailsRequest {
    /// Full or partial file name.
    pub(crate) file_name: String,
}

/// Handle `list_files`, rendering every artifact the backend currently knows about.
pub(crate) async fn handle_list_files(
    processing: &Arc<ProcessingService>,
) -> Result<String, ToolError> {
    let records = processing.list_artifacts().await?;
    tracing::debug!(count = records.len(), "Listed files");
    Ok(list_report(&records))
}

/// Handle `get_file_details` by locating the first artifact whose name contains the query.
pub(crate) async fn handle_file_details(
    processing: &Arc<ProcessingService>,
    arguments: Option<JsonObject>,
) -> Result<String, ToolError> {
    let args: FileDetailsRequest = parse_arguments(arguments)?;
    let query = args.file_name.trim();
    if query.is_empty() {
        return Err(ToolError::InvalidArguments(
            "`fileName` must not be empty".into(),
        ));
    }

    let record = processing
        .find_artifact(query)
        .await?
        .ok_or_else(|| ToolError::NotFound {
            name: query.to_string(),
        })?;
    Ok(details_report(&record))
}
