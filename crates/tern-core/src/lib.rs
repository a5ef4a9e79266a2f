//! tern-core - Core library for tern
//!
//! This crate provides the node model, the immutable graph store, the
//! selector language (parser and evaluator), node search helpers, and
//! configuration loading shared by the lineage resolver and the CLI.

pub mod config;
pub mod document;
pub mod error;
pub mod graph;
pub mod node;
pub mod node_id;
pub mod search;
pub mod selector;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::{Config, LineageConfig};
pub use document::GraphDocument;
pub use error::{CoreError, CoreResult, MalformedGraphError, ReferenceOrigin};
pub use graph::GraphStore;
pub use node::{
    ColumnLineage, ColumnMeta, EdgeKind, Node, NodeDetails, NodeKind, SourceRef,
};
pub use node_id::NodeId;
pub use search::{nodes_with_column, search_nodes, GraphSummary};
pub use selector::{select, Atom, Selection, SelectionQuery, SelectorTerm, TraversalDepth};
