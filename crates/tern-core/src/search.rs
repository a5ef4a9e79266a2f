//! Node search, column lookup and graph statistics

use crate::graph::GraphStore;
use crate::node::{Node, NodeKind};
use serde::Serialize;
use std::collections::BTreeSet;

/// Find nodes whose name or description contains `query`, ignoring case.
///
/// `kind` restricts the search to models or sources. Results follow graph
/// order.
pub fn search_nodes<'g>(store: &'g GraphStore, query: &str, kind: Option<NodeKind>) -> Vec<&'g Node> {
    let needle = query.to_lowercase();
    store
        .nodes()
        .filter(|node| kind.map_or(true, |k| node.resource_type() == k))
        .filter(|node| {
            node.name.to_lowercase().contains(&needle)
                || node.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Every node exposing `column`, paired with the column's spelling on that
/// node.
pub fn nodes_with_column<'g>(store: &'g GraphStore, column: &str) -> Vec<(&'g Node, &'g str)> {
    store
        .nodes()
        .filter_map(|node| node.resolve_column(column).map(|c| (node, c)))
        .collect()
}

/// Aggregate counts over a graph store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub models: usize,
    pub sources: usize,
    pub packages: BTreeSet<String>,
    /// Distinct (node, column) pairs, documented or appearing in lineage
    pub columns: usize,
    pub dependency_edges: usize,
    /// Data-flow column edges
    pub lineage_edges: usize,
    /// Filter and join column edges
    pub structural_edges: usize,
    /// Models whose column lineage was never computed
    pub unknown_lineage: usize,
    pub malformed_references: usize,
}

impl GraphSummary {
    /// Count everything in one pass over the store
    pub fn from_store(store: &GraphStore) -> Self {
        let mut summary = Self {
            dependency_edges: store.edge_count(),
            malformed_references: store.malformed().len(),
            ..Self::default()
        };

        for node in store.nodes() {
            match node.resource_type() {
                NodeKind::Model => summary.models += 1,
                NodeKind::Source => summary.sources += 1,
            }
            if !node.package.is_empty() {
                summary.packages.insert(node.package.clone());
            }
            summary.columns += node.column_names().len();

            if !node.column_lineage.is_known() {
                if !node.is_source() {
                    summary.unknown_lineage += 1;
                }
                continue;
            }
            for (_, refs) in node.column_lineage.entries() {
                for source in refs {
                    if source.kind.is_structural() {
                        summary.structural_edges += 1;
                    } else {
                        summary.lineage_edges += 1;
                    }
                }
            }
        }

        summary
    }
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
