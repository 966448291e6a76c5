//! Tool handlers for the MCP server.

use rmcp::model::JsonObject;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::{processing::UploadError, remote::RemoteError};

pub mod files;
pub mod upload;

/// Failures a tool invocation can report back to the agent.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments did not match the tool's input schema.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    /// The upload pipeline failed.
    #[error(transparent)]
    Upload(#[from] UploadError),
    /// A backend call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
    /// No artifact name contains the requested text.
    #[error("No file found matching \"{name}\"")]
    NotFound {
        /// Lookup text supplied by the caller.
        name: String,
    },
    /// The requested tool is not registered.
    #[error("Unknown tool: {name}")]
    UnknownTool {
        /// Tool name supplied by the caller.
        name: String,
    },
}

/// Parse structured arguments supplied to a tool invocation.
pub(crate) fn parse_arguments<T: DeserializeOwned>(
    arguments: Option<JsonObject>,
) -> Result<T, ToolError> {
    let value = arguments
        .map(Value::Object)
        .unwrap_or_else(|| Value::Object(JsonObject::new()));
    serde_json::from_value(value).map_err(|err| ToolError::InvalidArguments(err.to_string()))
}
