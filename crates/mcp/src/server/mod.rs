mod core;
mod http;
mod schemas;

pub use core::{McpToolServices, NodedocMcpCore};
pub use http::{McpHttpServer, RunningMcpHttpServer, resolve_bind_address};
pub use schemas::{FindSimilarOperationsRequest, NodeOperationsRequest, ValidateNodeOperationRequest};
