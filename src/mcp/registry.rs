use std::{collections::HashMap, future::Future, pin::Pin};

use rmcp::model::CallToolRequestParam;

use super::{handlers::ToolError, server::DocBridgeMcpServer};

pub type ToolFuture = Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send>>;

pub type ToolHandler = fn(&DocBridgeMcpServer, CallToolRequestParam) -> ToolFuture;

/// Registry mapping tool names to handler functions.
pub struct Registry {
    pub tools: HashMap<&'static str, ToolHandler>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register_tool(&mut self, name: &'static str, handler: ToolHandler) {
        self.tools.insert(name, handler);
    }
}
