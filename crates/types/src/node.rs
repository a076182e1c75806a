use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw node metadata as stored in the catalog.
///
/// `operations` may be a JSON-encoded string, an array of descriptors, or an
/// object keyed by resource name. `properties` is expected to be an array of
/// property definitions but is kept as raw JSON so malformed shapes can be
/// skipped instead of failing deserialization of the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    /// Fully qualified node type, for example `nodes-base.slack`.
    pub node_type: String,
    /// Human-readable name shown in listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Declared operations in any of the supported shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations: Option<Value>,
    /// Property definitions, including `operation`/`action` option lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
}

impl NodeRecord {
    /// Creates a record with only a node type set.
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            ..Default::default()
        }
    }

    /// Sets the raw `operations` payload.
    pub fn with_operations(mut self, operations: Value) -> Self {
        self.operations = Some(operations);
        self
    }

    /// Sets the raw `properties` payload.
    pub fn with_properties(mut self, properties: Value) -> Self {
        self.properties = Some(properties);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_camel_case_catalog_entry() {
        let record: NodeRecord = serde_json::from_value(json!({
            "nodeType": "nodes-base.slack",
            "displayName": "Slack",
            "operations": "[{\"operation\":\"send\"}]",
            "properties": [{"name": "resource"}]
        }))
        .expect("valid node record");

        assert_eq!(record.node_type, "nodes-base.slack");
        assert_eq!(record.display_name.as_deref(), Some("Slack"));
        assert!(matches!(record.operations, Some(Value::String(_))));
        assert!(record.properties.as_ref().is_some_and(Value::is_array));
    }

    #[test]
    fn missing_optional_fields_default_to_none() {
        let record: NodeRecord = serde_json::from_value(json!({"nodeType": "nodes-base.noOp"})).expect("valid node record");
        assert_eq!(record, NodeRecord::new("nodes-base.noOp"));
    }
}
