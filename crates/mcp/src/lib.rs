//! Model Context Protocol (MCP) server exposing nodedoc operation suggestions.
//!
//! The server runs locally over streamable HTTP and offers tools to validate
//! node operations, suggest replacements for invalid ones, and inspect the
//! loaded node catalog.

pub mod server;

pub use server::{McpHttpServer, McpToolServices, NodedocMcpCore, RunningMcpHttpServer, resolve_bind_address};
