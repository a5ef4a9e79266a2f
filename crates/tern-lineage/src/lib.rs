//! tern-lineage - Column-level lineage for tern
//!
//! Answers "which columns feed this column?" and "which columns does this
//! column feed?" across node boundaries, using the direct lineage stored on
//! each node of a [`tern_core::GraphStore`].

pub mod column;
pub mod error;
pub mod resolver;

pub use column::{ColumnKey, Direction, LineageEdge, LineageEntry, LineageResult, LineageTree, TreeNode};
pub use error::{LineageError, ResolveResult};
pub use resolver::{LineageResolver, ResolveOptions};
