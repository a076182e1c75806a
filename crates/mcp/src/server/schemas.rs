use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for operation suggestions.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FindSimilarOperationsRequest {
    /// Node type, for example `nodes-base.slack`.
    #[schemars(description = "Node type, for example 'nodes-base.slack'. Package prefixes and short names are accepted.")]
    pub node_type: String,
    /// The operation value that failed validation.
    #[schemars(description = "The invalid operation value to find alternatives for.")]
    pub operation: String,
    #[schemars(description = "Optional resource that restricts candidate operations, for example 'message'.")]
    pub resource: Option<String>,
    #[schemars(description = "Maximum number of suggestions to return. Defaults to 5.")]
    pub limit: Option<usize>,
}

/// Parameters for operation validation.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidateNodeOperationRequest {
    #[schemars(description = "Node type, for example 'nodes-base.googleDrive'.")]
    pub node_type: String,
    #[schemars(description = "Operation value configured on the node.")]
    pub operation: String,
    #[schemars(description = "Optional resource configured on the node.")]
    pub resource: Option<String>,
}

/// Parameters for listing a node's operations.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NodeOperationsRequest {
    #[schemars(description = "Node type whose operations should be listed.")]
    pub node_type: String,
    #[schemars(description = "Optional resource filter. Operations without a resource are always included.")]
    pub resource: Option<String>,
}
