//! JSON-backed node catalog.
//!
//! The catalog is loaded once into memory and served read-only. Lookups accept
//! the fully qualified node type (`nodes-base.slack`), the package-prefixed
//! form (`n8n-nodes-base.slack`) or the bare short name (`slack`).

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use nodedoc_types::NodeRecord;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

const BASE_PACKAGE_PREFIX: &str = "nodes-base.";
const PACKAGE_ALIASES: &[(&str, &str)] = &[
    ("n8n-nodes-base.", "nodes-base."),
    ("@n8n/n8n-nodes-langchain.", "nodes-langchain."),
    ("n8n-nodes-langchain.", "nodes-langchain."),
];

/// Read access to node metadata.
///
/// Implementations return `Ok(None)` for unknown nodes and reserve `Err` for
/// failures of the underlying store.
pub trait NodeRepository: Send + Sync {
    fn get_node(&self, node_type: &str) -> anyhow::Result<Option<NodeRecord>>;
}

/// Errors emitted while loading a catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read node catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse node catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("node catalog {path} has an unsupported shape: {reason}")]
    InvalidShape { path: PathBuf, reason: String },
}

impl CatalogError {
    pub fn invalid_shape(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidShape {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// In-memory node catalog keyed by normalized node type, in document order.
#[derive(Debug, Clone, Default)]
pub struct NodeCatalog {
    nodes: IndexMap<String, NodeRecord>,
}

impl NodeCatalog {
    /// Builds a catalog from already parsed records. Later duplicates replace
    /// earlier ones.
    pub fn from_records(records: impl IntoIterator<Item = NodeRecord>) -> Self {
        let mut catalog = Self::default();
        for record in records {
            catalog.insert(record);
        }
        catalog
    }

    /// Loads a catalog document from disk.
    ///
    /// Accepts either `{"nodes": [...]}` or a bare array of node records.
    /// Entries that do not deserialize as a node record are skipped with a
    /// warning.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Value = serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let entries = match document {
            Value::Array(entries) => entries,
            Value::Object(mut object) => match object.remove("nodes") {
                Some(Value::Array(entries)) => entries,
                _ => return Err(CatalogError::invalid_shape(path, "expected a `nodes` array")),
            },
            _ => return Err(CatalogError::invalid_shape(path, "expected an array or an object")),
        };

        let mut catalog = Self::default();
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<NodeRecord>(entry) {
                Ok(record) => catalog.insert(record),
                Err(error) => warn!(path = %path.display(), index, %error, "skipping malformed node catalog entry"),
            }
        }

        info!(path = %path.display(), node_count = catalog.len(), "node catalog loaded");
        Ok(catalog)
    }

    pub fn insert(&mut self, mut record: NodeRecord) {
        record.node_type = normalize_node_type(&record.node_type);
        self.nodes.insert(record.node_type.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node types in catalog order.
    pub fn node_types(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    /// Resolves a node by any accepted spelling of its type.
    pub fn find(&self, node_type: &str) -> Option<&NodeRecord> {
        let trimmed = node_type.trim();
        if let Some(record) = self.nodes.get(trimmed) {
            return Some(record);
        }

        let normalized = normalize_node_type(trimmed);
        if let Some(record) = self.nodes.get(&normalized) {
            return Some(record);
        }

        if !normalized.contains('.') {
            let qualified = format!("{BASE_PACKAGE_PREFIX}{normalized}");
            if let Some(record) = self.nodes.get(&qualified) {
                return Some(record);
            }
        }

        debug!(node_type = %trimmed, "node not found in catalog");
        None
    }
}

impl NodeRepository for NodeCatalog {
    fn get_node(&self, node_type: &str) -> anyhow::Result<Option<NodeRecord>> {
        Ok(self.find(node_type).cloned())
    }
}

/// Maps package-prefixed node types onto the short package form used as
/// catalog keys.
pub fn normalize_node_type(node_type: &str) -> String {
    let trimmed = node_type.trim();
    for (alias, canonical) in PACKAGE_ALIASES {
        if let Some(rest) = trimmed.strip_prefix(alias) {
            return format!("{canonical}{rest}");
        }
    }
    trimmed.to_string()
}
