//! On-disk graph document
//!
//! ```json
//! {
//!   "metadata": { "project_name": "shop" },
//!   "nodes": [
//!     {
//!       "id": "model.shop.stg_orders",
//!       "name": "stg_orders",
//!       "depends_on": ["source.shop.raw.orders"],
//!       "column_lineage": {
//!         "known": { "amount": [{ "node": "source.shop.raw.orders", "column": "amount" }] }
//!       }
//!     }
//!   ]
//! }
//! ```

use crate::error::{CoreError, CoreResult};
use crate::graph::GraphStore;
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Serialized form of a graph: producer metadata plus the node list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Free-form producer metadata (project name, generator version, ...)
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,

    /// Nodes in the order they are stored
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl GraphDocument {
    /// Read a graph document from a JSON file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::GraphNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Parse a graph document from a JSON string
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Project name recorded by the producer, if any
    pub fn project_name(&self) -> Option<&str> {
        self.metadata.get("project_name").and_then(|v| v.as_str())
    }

    /// Build the graph store from this document's nodes
    pub fn into_store(self, strict: bool) -> CoreResult<GraphStore> {
        if strict {
            GraphStore::build_strict(self.nodes)
        } else {
            GraphStore::build(self.nodes)
        }
    }
}

#[cfg(test)]
#[path = "document_test.rs"]
mod tests;
