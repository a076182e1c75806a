//! Normalization of node metadata into [`OperationDescriptor`] lists.
//!
//! Stored metadata is inconsistent: `operations` may be a JSON string, an
//! array, or an object keyed by resource, and option lists may also hide in
//! `operation`/`action` properties. All shape detection happens here, once,
//! through [`RawOperations`].

use nodedoc_types::{NodeRecord, OperationDescriptor};
use serde_json::{Map, Value};
use tracing::error;

use crate::SuggestionError;

const OPERATION_PROPERTY: &str = "operation";
const ACTION_PROPERTY: &str = "action";

/// The shapes the `operations` field is known to arrive in.
#[derive(Debug, PartialEq)]
pub(crate) enum RawOperations<'a> {
    Encoded(&'a str),
    List(&'a [Value]),
    ByResource(&'a Map<String, Value>),
    Absent,
}

impl<'a> RawOperations<'a> {
    pub(crate) fn classify(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::String(encoded)) => Self::Encoded(encoded),
            Some(Value::Array(items)) => Self::List(items),
            Some(Value::Object(by_resource)) => Self::ByResource(by_resource),
            _ => Self::Absent,
        }
    }
}

/// Extracts every operation declared by `record`, restricted to `resource` when given.
///
/// Declared operations come first, followed by options of the node's
/// `operation` (or `action`) property. Only malformed JSON in `operations`
/// is an error; any other unexpected shape contributes nothing.
pub(crate) fn normalize_operations(record: &NodeRecord, resource: Option<&str>) -> Result<Vec<OperationDescriptor>, SuggestionError> {
    let mut operations = declared_operations(record)?;
    operations.extend(property_operations(record.properties.as_ref(), resource));

    if let Some(resource) = resource {
        operations.retain(|operation| operation.resource.as_deref().is_none_or(|declared| declared == resource));
    }

    Ok(operations)
}

fn declared_operations(record: &NodeRecord) -> Result<Vec<OperationDescriptor>, SuggestionError> {
    match RawOperations::classify(record.operations.as_ref()) {
        RawOperations::Encoded(encoded) => {
            let decoded: Value = serde_json::from_str(encoded).map_err(|source| {
                error!(node_type = %record.node_type, error = %source, "stored operations are not valid JSON");
                SuggestionError::operation_parsing(&record.node_type, source)
            })?;
            // Decoded payloads are not decoded again.
            Ok(match RawOperations::classify(Some(&decoded)) {
                RawOperations::List(items) => descriptors_from_items(items),
                RawOperations::ByResource(by_resource) => flatten_by_resource(by_resource),
                RawOperations::Encoded(_) | RawOperations::Absent => Vec::new(),
            })
        }
        RawOperations::List(items) => Ok(descriptors_from_items(items)),
        RawOperations::ByResource(by_resource) => Ok(flatten_by_resource(by_resource)),
        RawOperations::Absent => Ok(Vec::new()),
    }
}

fn flatten_by_resource(by_resource: &Map<String, Value>) -> Vec<OperationDescriptor> {
    by_resource
        .values()
        .filter_map(Value::as_array)
        .flat_map(|items| descriptors_from_items(items))
        .collect()
}

fn descriptors_from_items(items: &[Value]) -> Vec<OperationDescriptor> {
    items.iter().filter_map(descriptor_from_item).collect()
}

fn descriptor_from_item(item: &Value) -> Option<OperationDescriptor> {
    match item {
        Value::String(operation) => Some(OperationDescriptor::new(operation.clone())),
        Value::Object(fields) => {
            let operation = string_field(fields, "operation").or_else(|| string_field(fields, "value"))?;
            Some(OperationDescriptor {
                operation,
                name: string_field(fields, "name"),
                description: string_field(fields, "description"),
                resource: string_field(fields, "resource"),
                action: string_field(fields, "action"),
            })
        }
        _ => None,
    }
}

fn property_operations(properties: Option<&Value>, resource: Option<&str>) -> Vec<OperationDescriptor> {
    let Some(properties) = properties.and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut selected = option_properties_named(properties, OPERATION_PROPERTY);
    if selected.is_empty() {
        selected = option_properties_named(properties, ACTION_PROPERTY);
    }

    let mut operations = Vec::new();
    for (property, options) in selected {
        let constraint = resource_constraint(property);
        let attached_resources: Vec<Option<String>> = match (&constraint, resource) {
            (Some(allowed), Some(requested)) if !allowed.iter().any(|candidate| candidate == requested) => continue,
            (Some(_), Some(requested)) => vec![Some(requested.to_string())],
            (Some(allowed), None) if !allowed.is_empty() => allowed.iter().cloned().map(Some).collect(),
            _ => vec![None],
        };

        for option in options.iter().filter_map(Value::as_object) {
            let Some(operation) = string_field(option, "value") else {
                continue;
            };
            for attached in &attached_resources {
                operations.push(OperationDescriptor {
                    operation: operation.clone(),
                    name: string_field(option, "name"),
                    description: string_field(option, "description"),
                    resource: attached.clone(),
                    action: string_field(option, "action"),
                });
            }
        }
    }
    operations
}

fn option_properties_named<'a>(properties: &'a [Value], name: &str) -> Vec<(&'a Map<String, Value>, &'a Vec<Value>)> {
    properties
        .iter()
        .filter_map(Value::as_object)
        .filter(|property| property.get("name").and_then(Value::as_str) == Some(name))
        .filter_map(|property| {
            let options = property.get("options")?.as_array()?;
            Some((property, options))
        })
        .collect()
}

/// Resources listed under `displayOptions.show.resource`, as a single string or an array.
fn resource_constraint(property: &Map<String, Value>) -> Option<Vec<String>> {
    let constraint = property.get("displayOptions")?.get("show")?.get("resource")?;
    match constraint {
        Value::String(resource) => Some(vec![resource.clone()]),
        Value::Array(resources) => Some(resources.iter().filter_map(Value::as_str).map(str::to_string).collect()),
        _ => None,
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}
