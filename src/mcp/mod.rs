//! Model Context Protocol (MCP) integration.
//!
//! Exposes the document backend to agent hosts over stdio through three tools:
//! `upload_and_process`, `list_files`, and `get_file_details`. Every tool answers with a plain
//! text report; failures are reported as tool-level errors rather than protocol errors so one
//! failed call never disturbs the session.
//!
//! Handlers, schemas, and report formatting live in focused submodules.

mod format;
pub mod handlers;
mod registry;
mod schemas;
mod server;

pub use server::DocBridgeMcpServer;
