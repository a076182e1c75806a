use std::sync::Arc;

use nodedoc_engine::{OperationValidator, SuggestionEngine};
use nodedoc_registry::NodeCatalog;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, ErrorData, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use rmcp::{ServerHandler, tool, tool_handler, tool_router};
use serde_json::{Value, json};
use tracing::info;

use crate::server::schemas::{FindSimilarOperationsRequest, NodeOperationsRequest, ValidateNodeOperationRequest};

/// Shared services for MCP tool handlers.
#[derive(Debug)]
pub struct McpToolServices {
    catalog: Arc<NodeCatalog>,
    engine: Arc<SuggestionEngine>,
    validator: OperationValidator,
}

impl McpToolServices {
    pub fn new(catalog: Arc<NodeCatalog>, engine: Arc<SuggestionEngine>) -> Self {
        let validator = OperationValidator::new(Arc::clone(&engine));
        Self {
            catalog,
            engine,
            validator,
        }
    }

    fn find_similar_operations(&self, request: &FindSimilarOperationsRequest) -> Result<Value, ErrorData> {
        let node_type = required_field("node_type", &request.node_type)?;
        let operation = required_field("operation", &request.operation)?;
        if request.limit == Some(0) {
            return Err(ErrorData::invalid_params("limit must be at least 1", None));
        }
        let suggestions = self
            .engine
            .find_similar_operations(node_type, operation, request.resource.as_deref(), request.limit);
        Ok(json!({
            "node_type": node_type,
            "operation": operation,
            "resource": request.resource,
            "suggestions": suggestions,
        }))
    }

    fn validate_node_operation(&self, request: &ValidateNodeOperationRequest) -> Result<Value, ErrorData> {
        let node_type = required_field("node_type", &request.node_type)?;
        let check = self.validator.check(node_type, &request.operation, request.resource.as_deref());
        serde_json::to_value(check).map_err(|error| ErrorData::internal_error(error.to_string(), None))
    }

    fn get_node_operations(&self, request: &NodeOperationsRequest) -> Result<Value, ErrorData> {
        let node_type = required_field("node_type", &request.node_type)?;
        let operations = self
            .engine
            .get_node_operations(node_type, request.resource.as_deref())
            .map_err(|error| ErrorData::internal_error(error.to_string(), None))?;
        Ok(json!({
            "node_type": node_type,
            "resource": request.resource,
            "known_node": self.engine.has_node(node_type),
            "operations": operations,
        }))
    }

    fn list_node_types(&self) -> Value {
        json!({ "node_types": self.catalog.node_types() })
    }

    fn clear_suggestion_cache(&self) -> Value {
        self.engine.clear_cache();
        json!({ "cleared": true })
    }
}

fn required_field<'a>(name: &str, value: &'a str) -> Result<&'a str, ErrorData> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ErrorData::invalid_params(format!("{name} must not be empty"), None));
    }
    Ok(trimmed)
}

#[derive(Clone)]
pub struct NodedocMcpCore {
    tool_router: ToolRouter<Self>,
    services: Arc<McpToolServices>,
}

#[tool_router]
impl NodedocMcpCore {
    /// Create a new MCP core handler with shared service dependencies.
    pub fn new(services: Arc<McpToolServices>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            services,
        }
    }

    #[tool(
        annotations(read_only_hint = true),
        description = "Suggest valid operations for a node whose configured operation does not exist. Input: node_type, operation, optional resource, optional limit. Returns suggestions ordered by confidence (0..1) with a reason for each. Returns an empty list when the operation is already valid."
    )]
    async fn find_similar_operations(&self, param: Parameters<FindSimilarOperationsRequest>) -> Result<CallToolResult, ErrorData> {
        let structured = self.services.find_similar_operations(&param.0)?;
        info!(tool = "find_similar_operations", node_type = %param.0.node_type, "mcp tool call");
        Ok(CallToolResult::structured(structured))
    }

    #[tool(
        annotations(read_only_hint = true),
        description = "Check whether an operation exists for a node (optionally scoped to a resource). Returns valid, a human-readable message, and suggestions when invalid."
    )]
    async fn validate_node_operation(&self, param: Parameters<ValidateNodeOperationRequest>) -> Result<CallToolResult, ErrorData> {
        let structured = self.services.validate_node_operation(&param.0)?;
        info!(tool = "validate_node_operation", node_type = %param.0.node_type, "mcp tool call");
        Ok(CallToolResult::structured(structured))
    }

    #[tool(
        annotations(read_only_hint = true),
        description = "List the normalized operations of a node. Use to see every valid operation value, optionally filtered by resource."
    )]
    async fn get_node_operations(&self, param: Parameters<NodeOperationsRequest>) -> Result<CallToolResult, ErrorData> {
        let structured = self.services.get_node_operations(&param.0)?;
        info!(tool = "get_node_operations", node_type = %param.0.node_type, "mcp tool call");
        Ok(CallToolResult::structured(structured))
    }

    #[tool(annotations(read_only_hint = true), description = "List every node type in the loaded catalog.")]
    async fn list_node_types(&self) -> Result<CallToolResult, ErrorData> {
        info!(tool = "list_node_types", "mcp tool call");
        Ok(CallToolResult::structured(self.services.list_node_types()))
    }

    #[tool(description = "Drop cached operation lists and suggestions so the next lookups read the catalog again.")]
    async fn clear_suggestion_cache(&self) -> Result<CallToolResult, ErrorData> {
        info!(tool = "clear_suggestion_cache", "mcp tool call");
        Ok(CallToolResult::structured(self.services.clear_suggestion_cache()))
    }
}

#[tool_handler]
impl ServerHandler for NodedocMcpCore {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "Nodedoc".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Nodedoc MCP".to_string()),
                ..Default::default()
            },
            instructions: Some(
                "Workflow node operation helper.\n1) When a node operation is rejected, call validate_node_operation or find_similar_operations.\n2) Prefer the first suggestion; confidence >= 0.85 usually means a recognized naming pattern.\n3) Use get_node_operations to list every valid value, passing the node's resource when it has one.".to_string(),
            ),
        }
    }
}
