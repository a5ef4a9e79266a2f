//! Error types for tern-core

use crate::node_id::NodeId;
use std::fmt;
use thiserror::Error;

/// Core error type for tern
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Graph document not found
    #[error("[E003] Graph document not found: {path}")]
    GraphNotFound { path: String },

    /// E004: No node with the given id
    #[error("[E004] Node not found: {id}")]
    NodeNotFound { id: String },

    /// E005: Two nodes share the same id
    #[error("[E005] Duplicate node id: {id}")]
    DuplicateNode { id: String },

    /// E006: A bare node name matches more than one node
    #[error("[E006] Node name '{name}' is ambiguous, matches: {candidates}")]
    AmbiguousNode { name: String, candidates: String },

    /// E007: Node id is empty
    #[error("[E007] Node id cannot be empty ({context})")]
    EmptyNodeId { context: String },

    /// E008: Reference to an unknown node (only raised in strict builds)
    #[error(transparent)]
    MalformedGraph(#[from] MalformedGraphError),

    /// E009: Malformed selector expression
    #[error("[E009] Invalid selector '{selector}' at position {position} near '{fragment}': {reason}")]
    SelectorSyntax {
        selector: String,
        fragment: String,
        position: usize,
        reason: String,
    },

    /// E014: IO error
    #[error("[E014] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E016: IO error with file path context
    #[error("[E016] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E015: Config/YAML parse error
    #[error("[E015] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Where a dangling reference was found while building the graph store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceOrigin {
    /// A `depends_on` entry
    DependsOn,
    /// A source reference inside `column_lineage[column]`
    ColumnLineage { column: String },
}

impl fmt::Display for ReferenceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceOrigin::DependsOn => write!(f, "depends_on"),
            ReferenceOrigin::ColumnLineage { column } => write!(f, "column_lineage[{}]", column),
        }
    }
}

/// E008: an edge or lineage reference points at a node id that is not in
/// the graph.
///
/// The graph store drops the offending reference and keeps building; the
/// collected errors are available from [`GraphStore::malformed`](crate::GraphStore::malformed).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[E008] {origin} of '{from}' references unknown node '{target}'")]
pub struct MalformedGraphError {
    /// Node that owns the reference
    pub from: NodeId,
    /// The unknown node id
    pub target: NodeId,
    /// Which part of the node held the reference
    pub origin: ReferenceOrigin,
}
