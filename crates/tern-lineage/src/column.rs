//! Column keys, lineage edges and query results

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tern_core::{EdgeKind, NodeId};

/// A `(node, column)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ColumnKey {
    pub node: NodeId,
    pub column: String,
}

impl ColumnKey {
    pub fn new(node: impl Into<NodeId>, column: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node, self.column)
    }
}

/// Traversal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Upstream: the columns a column is derived from
    Ancestors,
    /// Downstream: the columns derived from a column
    Descendants,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ancestors => write!(f, "ancestors"),
            Direction::Descendants => write!(f, "descendants"),
        }
    }
}

/// A column reached by a lineage query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineageEntry {
    pub key: ColumnKey,
    /// Hops from the starting column
    pub depth: usize,
    /// Lineage ends here in the traversal direction
    pub terminal: bool,
}

/// One-hop column edge, always oriented upstream -> downstream
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LineageEdge {
    pub from: ColumnKey,
    pub to: ColumnKey,
    pub kind: EdgeKind,
}

/// Result of resolving the lineage of one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineageResult {
    /// The starting column, canonically spelled
    pub root: ColumnKey,
    pub direction: Direction,
    /// Reached columns in BFS order, without the root
    pub columns: Vec<LineageEntry>,
    /// Distinct edges followed
    pub edges: Vec<LineageEdge>,
}

impl LineageResult {
    /// Look up a reached column
    pub fn get(&self, node: &str, column: &str) -> Option<&LineageEntry> {
        self.columns
            .iter()
            .find(|e| e.key.node == node && e.key.column == column)
    }

    /// Check whether a column was reached
    pub fn contains(&self, node: &str, column: &str) -> bool {
        self.get(node, column).is_some()
    }

    /// Distinct nodes owning a reached column, in first-reached order
    pub fn nodes(&self) -> Vec<&NodeId> {
        let mut nodes: Vec<&NodeId> = Vec::new();
        for entry in &self.columns {
            if !nodes.contains(&&entry.key.node) {
                nodes.push(&entry.key.node);
            }
        }
        nodes
    }

    /// Reached columns where lineage ends
    pub fn terminals(&self) -> impl Iterator<Item = &LineageEntry> {
        self.columns.iter().filter(|e| e.terminal)
    }

    /// Number of reached columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether nothing was reached
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Squash the result into a tree: every column once, with all of its
    /// distinct parents and children among the followed edges.
    pub fn tree(&self) -> LineageTree {
        let mut nodes = Vec::with_capacity(self.columns.len() + 1);
        nodes.push(TreeNode {
            key: self.root.clone(),
            depth: 0,
            terminal: self.columns.is_empty(),
            parents: Vec::new(),
            children: Vec::new(),
        });
        nodes.extend(self.columns.iter().map(|entry| TreeNode {
            key: entry.key.clone(),
            depth: entry.depth,
            terminal: entry.terminal,
            parents: Vec::new(),
            children: Vec::new(),
        }));

        let position: HashMap<ColumnKey, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.key.clone(), i))
            .collect();

        for edge in &self.edges {
            if let Some(&i) = position.get(&edge.to) {
                if !nodes[i].parents.contains(&edge.from) {
                    nodes[i].parents.push(edge.from.clone());
                }
            }
            if let Some(&i) = position.get(&edge.from) {
                if !nodes[i].children.contains(&edge.to) {
                    nodes[i].children.push(edge.to.clone());
                }
            }
        }

        LineageTree {
            root: self.root.clone(),
            direction: self.direction,
            nodes,
        }
    }
}

/// Squashed lineage: one entry per column, root first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineageTree {
    pub root: ColumnKey,
    pub direction: Direction,
    pub nodes: Vec<TreeNode>,
}

/// A column in a [`LineageTree`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub key: ColumnKey,
    pub depth: usize,
    pub terminal: bool,
    /// Direct upstream columns
    pub parents: Vec<ColumnKey>,
    /// Direct downstream columns
    pub children: Vec<ColumnKey>,
}

impl LineageTree {
    /// Find a column's entry
    pub fn node(&self, key: &ColumnKey) -> Option<&TreeNode> {
        self.nodes.iter().find(|n| n.key == *key)
    }

    /// Next columns away from the root
    pub fn next(&self, key: &ColumnKey) -> &[ColumnKey] {
        match (self.node(key), self.direction) {
            (Some(node), Direction::Ancestors) => &node.parents,
            (Some(node), Direction::Descendants) => &node.children,
            (None, _) => &[],
        }
    }
}

#[cfg(test)]
#[path = "column_test.rs"]
mod tests;
