#![deny(missing_docs)]

//! Core library for the DocBridge MCP server.

/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Model Context Protocol server implementation.
pub mod mcp;
/// Upload orchestration, artifact matching, and polling.
pub mod processing;
/// Document backend HTTP integration.
pub mod remote;
