//! Error types for tern-lineage

use tern_core::CoreError;
use thiserror::Error;

/// Lineage query error
///
/// These use the `L` prefix to stay apart from the `E` codes of tern-core.
#[derive(Error, Debug)]
pub enum LineageError {
    /// L001: Starting node does not exist
    #[error("[L001] Node not found: {id}")]
    NodeNotFound { id: String },

    /// L002: Starting node has no such column
    #[error("[L002] Column '{column}' not found on node '{node}'")]
    ColumnNotFound { node: String, column: String },

    /// L003: Starting node is excluded by the query scope
    #[error("[L003] Node '{id}' is outside the selected scope")]
    NodeOutOfScope { id: String },

    /// L004: Core error propagation
    #[error("[L004] Core error: {0}")]
    Core(#[from] CoreError),
}

/// Result type alias for LineageError
pub type ResolveResult<T> = Result<T, LineageError>;
