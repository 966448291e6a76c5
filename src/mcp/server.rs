//! MCP server bootstrap and request dispatch.

use std::{borrow::Cow, sync::Arc};

use crate::{
    mcp::{
        format::error_report,
        handlers::{
            ToolError,
            files::{handle_file_details, handle_list_files},
            upload::handle_upload,
        },
        registry, schemas,
    },
    processing::ProcessingService,
};
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, ListToolsResult, ServerCapabilities,
        ServerInfo, Tool, ToolAnnotations,
    },
};

const UPLOAD_TOOL: &str = "upload_and_process";
const LIST_TOOL: &str = "list_files";
const DETAILS_TOOL: &str = "get_file_details";

/// MCP server implementation exposing the document backend as tools.
#[derive(Clone)]
pub struct DocBridgeMcpServer {
    processing: Arc<ProcessingService>,
    registry: Arc<registry::Registry>,
}

impl DocBridgeMcpServer {
    /// Create a new MCP server using the supplied processing service.
    pub fn new(processing: Arc<ProcessingService>) -> Self {
        let mut registry = registry::Registry::new();
        registry.register_tool(UPLOAD_TOOL, tool_upload);
        registry.register_tool(LIST_TOOL, tool_list_files);
        registry.register_tool(DETAILS_TOOL, tool_file_details);

        Self {
            processing,
            registry: Arc::new(registry),
        }
    }

    fn describe_tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: Cow::Borrowed(UPLOAD_TOOL),
                title: Some("Upload & Process Document".to_string()),
                description: Some(Cow::Borrowed(
                    "Upload a local file for classification and wait up to five minutes for the result. Returns the classification, organization, and summary, or the upload id if processing is still running.",
                )),
                input_schema: Arc::new(schemas::upload_input_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Upload & Process Document")
                        .destructive(false)
                        .idempotent(false)
                        .open_world(true),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed(LIST_TOOL),
                title: Some("List Files".to_string()),
                description: Some(Cow::Borrowed(
                    "List every document the backend holds with its status, class, and a short summary.",
                )),
                input_schema: Arc::new(schemas::empty_object_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("List Files")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(true),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed(DETAILS_TOOL),
                title: Some("File Details".to_string()),
                description: Some(Cow::Borrowed(
                    "Show full metadata for the first document whose name contains `fileName` (case-insensitive).",
                )),
                input_schema: Arc::new(schemas::file_details_input_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("File Details")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(true),
                ),
                icons: None,
            },
        ]
    }
}

fn tool_upload(server: &DocBridgeMcpServer, request: CallToolRequestParam) -> registry::ToolFuture {
    let processing = server.processing.clone();
    Box::pin(async move { handle_upload(&processing, request.arguments).await })
}

fn tool_list_files(
    server: &DocBridgeMcpServer,
    _request: CallToolRequestParam,
) -> registry::ToolFuture {
    let processing = server.processing.clone();
    Box::pin(async move { handle_list_files(&processing).await })
}

fn tool_file_details(
    server: &DocBridgeMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let processing = server.processing.clone();
    Box::pin(async move { handle_file_details(&processing, request.arguments).await })
}

/// Convert a handler result into the tool response shown to the agent.
fn into_call_result(tool: &str, result: Result<String, ToolError>) -> CallToolResult {
    match result {
        Ok(report) => CallToolResult::success(vec![Content::text(report)]),
        Err(error) => {
            tracing::warn!(tool, error = %error, "Tool call failed");
            CallToolResult::error(vec![Content::text(error_report(&error))])
        }
    }
}

impl ServerHandler for DocBridgeMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut implementation = rmcp::model::Implementation::from_build_env();
        implementation.name = "docbridge".to_string();
        implementation.title = Some("DocBridge MCP".to_string());
        implementation.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: implementation,
            instructions: Some(
                "Use upload_and_process to submit a local document for classification and summary; it waits for the backend and reports the result or an upload id when processing is still running. Use list_files to browse processed documents and get_file_details to inspect one by name.".into(),
            ),
            ..ServerInfo::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools = self.describe_tools();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            let tool = request.name.to_string();
            tracing::info!(tool = %tool, "Tool invoked");
            let result = match self.registry.tools.get(tool.as_str()) {
                Some(handler) => handler(self, request).await,
                None => Err(ToolError::UnknownTool { name: tool.clone() }),
            };
            Ok(into_call_result(&tool, result))
        }
    }
}
