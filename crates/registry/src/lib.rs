//! Node metadata catalog for nodedoc.
//!
//! This crate owns the repository seam consumed by the suggestion engine
//! ([`NodeRepository`]), a JSON-file-backed implementation ([`NodeCatalog`]),
//! and the on-disk configuration that locates the catalog.

pub mod catalog;
pub mod config;

pub use catalog::{CatalogError, NodeCatalog, NodeRepository, normalize_node_type};
pub use config::{RegistryConfig, default_config_path, expand_tilde};
