use std::sync::Arc;

use nodedoc_types::OperationCheck;
use tracing::{debug, warn};

use crate::SuggestionEngine;

const LISTED_OPERATION_LIMIT: usize = 5;

/// Checks node operations and explains invalid ones using the suggestion engine.
#[derive(Debug, Clone)]
pub struct OperationValidator {
    engine: Arc<SuggestionEngine>,
}

impl OperationValidator {
    pub fn new(engine: Arc<SuggestionEngine>) -> Self {
        Self { engine }
    }

    pub fn check(&self, node_type: &str, operation: &str, resource: Option<&str>) -> OperationCheck {
        let mut check = OperationCheck {
            node_type: node_type.to_string(),
            operation: operation.to_string(),
            resource: resource.map(str::to_string),
            valid: false,
            suggestions: Vec::new(),
            message: String::new(),
        };

        if !self.engine.has_node(node_type) {
            check.message = format!("Unknown node type '{node_type}'");
            return check;
        }

        let operations = match self.engine.get_node_operations(node_type, resource) {
            Ok(operations) => operations,
            Err(error) => {
                warn!(node_type = %node_type, %error, "cannot validate operation");
                check.message = format!("Operations for '{node_type}' could not be read: {error}");
                return check;
            }
        };

        if operations.iter().any(|candidate| candidate.operation == operation) {
            check.valid = true;
            check.message = format!("'{operation}' is a valid operation for {}", scope_label(node_type, resource));
            return check;
        }

        check.suggestions = self.engine.find_similar_operations(node_type, operation, resource, None);
        check.message = match check.suggestions.first() {
            Some(best) => format!(
                "Invalid operation '{operation}' for {}. Did you mean '{}'?",
                scope_label(node_type, resource),
                best.value
            ),
            None if operations.is_empty() => format!(
                "Invalid operation '{operation}' for {}. No operations are available.",
                scope_label(node_type, resource)
            ),
            None => {
                let mut listed: Vec<&str> = Vec::new();
                for candidate in &operations {
                    if !listed.contains(&candidate.operation.as_str()) {
                        listed.push(&candidate.operation);
                    }
                    if listed.len() == LISTED_OPERATION_LIMIT {
                        break;
                    }
                }
                format!(
                    "Invalid operation '{operation}' for {}. Valid operations include: {}",
                    scope_label(node_type, resource),
                    listed.join(", ")
                )
            }
        };
        debug!(
            node_type = %node_type,
            operation = %operation,
            suggestion_count = check.suggestions.len(),
            "operation rejected"
        );
        check
    }
}

fn scope_label(node_type: &str, resource: Option<&str>) -> String {
    match resource {
        Some(resource) => format!("{node_type} (resource '{resource}')"),
        None => node_type.to_string(),
    }
}
