//! # Nodedoc Engine
//!
//! Suggests the operation a workflow author most likely meant when a node is
//! configured with an operation that does not exist.
//!
//! ## Key Features
//!
//! - **Normalization**: Reads operations from inconsistent node metadata
//!   (JSON-encoded strings, arrays, resource-keyed objects, property options)
//! - **Pattern Matching**: Category-specific tables map familiar names such as
//!   `listFiles` to the node's real operation
//! - **Similarity Scoring**: Case-insensitive edit-distance scoring with typo
//!   floors for short words
//! - **Caching**: TTL-bound operation lists and bounded suggestion results,
//!   maintained opportunistically
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use nodedoc_engine::{EngineConfig, SuggestionEngine};
//! use nodedoc_registry::NodeCatalog;
//! use nodedoc_types::NodeRecord;
//!
//! let catalog = NodeCatalog::from_records([
//!     NodeRecord::new("nodes-base.slack").with_operations(serde_json::json!(["send", "get", "delete"])),
//! ]);
//! let engine = SuggestionEngine::new(Arc::new(catalog), EngineConfig::default());
//!
//! let suggestions = engine.find_similar_operations("nodes-base.slack", "sned", None, None);
//! assert_eq!(suggestions[0].value, "send");
//! ```
//!
//! ## Architecture
//!
//! - **`normalizer`**: Metadata shape detection and operation extraction
//! - **`patterns`**: Static pattern tables per node category
//! - **`similarity`**: Scoring functions and reason labels
//! - **`engine`**: Caching and ranking behind [`SuggestionEngine`]
//! - **`validation`**: Valid/invalid verdicts with messages via [`OperationValidator`]

mod cache;
pub mod config;
pub mod engine;
pub mod error;
mod normalizer;
pub mod patterns;
pub mod sampler;
pub mod similarity;
pub mod validation;

pub use config::EngineConfig;
pub use engine::SuggestionEngine;
pub use error::SuggestionError;
pub use patterns::{PatternEntry, get_node_patterns};
pub use sampler::{FixedSampler, MaintenanceSampler, RandomSampler};
pub use similarity::{are_common_variations, calculate_similarity, get_similarity_reason, levenshtein_distance};
pub use validation::OperationValidator;
