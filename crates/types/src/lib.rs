//! Shared data model for the nodedoc workspace.
//!
//! Node records arrive from the metadata catalog in loosely structured shapes, so
//! [`NodeRecord`] keeps the raw JSON for `operations` and `properties`. Everything
//! downstream of the normalizer works with the strongly typed
//! [`OperationDescriptor`] and [`SimilaritySuggestion`].

pub mod node;
pub mod operation;
pub mod suggestion;

pub use node::NodeRecord;
pub use operation::OperationDescriptor;
pub use suggestion::{OperationCheck, SimilaritySuggestion};
