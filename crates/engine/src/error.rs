//! Error types for operation lookup.

use thiserror::Error;

/// Errors raised while loading a node's operations.
///
/// Only corrupted stored data is reported; repository failures and unknown
/// nodes degrade to an empty operation list.
///
/// [`SuggestionEngine::find_similar_operations`](crate::SuggestionEngine::find_similar_operations)
/// never surfaces these; they are visible to callers of
/// [`SuggestionEngine::get_node_operations`](crate::SuggestionEngine::get_node_operations).
#[derive(Debug, Error)]
pub enum SuggestionError {
    /// Stored operations JSON for a node is malformed.
    #[error("operation parsing failure for node {node_type}: {source}")]
    OperationParsing {
        node_type: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SuggestionError {
    /// Create an operation parsing error.
    pub fn operation_parsing(node_type: impl Into<String>, source: serde_json::Error) -> Self {
        Self::OperationParsing {
            node_type: node_type.into(),
            source,
        }
    }

    /// Node type the error refers to.
    pub fn node_type(&self) -> &str {
        match self {
            Self::OperationParsing { node_type, .. } => node_type,
        }
    }
}
