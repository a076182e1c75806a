use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A ranked "did you mean" candidate for an invalid operation.
///
/// `value` always names an operation that exists on the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SimilaritySuggestion {
    /// Operation value to use instead of the invalid one.
    pub value: String,
    /// Likelihood in `(0, 1]` that this is the intended operation.
    pub confidence: f64,
    /// Short human-readable explanation of the match.
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

/// Outcome of checking an operation value against a node's declared operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OperationCheck {
    pub node_type: String,
    pub operation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    pub valid: bool,
    /// Suggestions for an invalid operation, best first. Empty when valid.
    #[serde(default)]
    pub suggestions: Vec<SimilaritySuggestion>,
    /// Human-readable summary suitable for surfacing to the caller.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn suggestion_omits_absent_metadata() {
        let suggestion = SimilaritySuggestion {
            value: "send".into(),
            confidence: 0.75,
            reason: "similar operation".into(),
            description: None,
            resource: Some("message".into()),
        };

        let value = serde_json::to_value(&suggestion).expect("serialize suggestion");
        assert_eq!(
            value,
            json!({"value": "send", "confidence": 0.75, "reason": "similar operation", "resource": "message"})
        );
    }
}
