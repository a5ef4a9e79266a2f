//! Node types for the transformation graph.
//!
//! A [`Node`] is either a model (a transformation that reads other nodes) or
//! a source (an external table that is a leaf of the graph). Kind-specific
//! attributes live in [`NodeDetails`]; anything the producer emitted that
//! tern does not understand is kept in [`Node::meta`].

use crate::node_id::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Canonical resource kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// SQL transformation model
    Model,
    /// External data source
    Source,
}

impl NodeKind {
    /// Parse a kind from its lowercase name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "model" => Some(NodeKind::Model),
            "source" => Some(NodeKind::Source),
            _ => None,
        }
    }

    /// Human-readable label for error messages and display.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Model => "model",
            NodeKind::Source => "source",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind-specific node attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeDetails {
    /// A transformation model
    Model {
        /// Materialization (view, table, incremental, ...)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        materialized: Option<String>,
        /// Target schema
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema: Option<String>,
    },
    /// An external source table
    Source {
        /// Source schema (the source name in `source.<schema>.<table>`)
        schema: String,
        /// Table name
        table: String,
    },
}

impl NodeDetails {
    /// The resource kind these details describe.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeDetails::Model { .. } => NodeKind::Model,
            NodeDetails::Source { .. } => NodeKind::Source,
        }
    }
}

impl Default for NodeDetails {
    fn default() -> Self {
        NodeDetails::Model {
            materialized: None,
            schema: None,
        }
    }
}

/// How an upstream column participates in producing a downstream column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// The upstream value flows into the output column
    #[default]
    Data,
    /// The upstream column is used in a WHERE/HAVING predicate
    Filter,
    /// The upstream column is used in a JOIN condition
    Join,
}

impl EdgeKind {
    /// Whether this edge describes row selection rather than value flow.
    pub fn is_structural(&self) -> bool {
        !matches!(self, EdgeKind::Data)
    }

    fn is_data(&self) -> bool {
        matches!(self, EdgeKind::Data)
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeKind::Data => write!(f, "data"),
            EdgeKind::Filter => write!(f, "filter"),
            EdgeKind::Join => write!(f, "join"),
        }
    }
}

/// One-hop reference from an output column to an upstream column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    /// Upstream node id
    pub node: NodeId,
    /// Upstream column name
    pub column: String,
    /// Edge kind, `data` when omitted
    #[serde(default, skip_serializing_if = "EdgeKind::is_data")]
    pub kind: EdgeKind,
}

impl SourceRef {
    /// Create a reference with an explicit edge kind
    pub fn new(node: impl Into<NodeId>, column: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            node: node.into(),
            column: column.into(),
            kind,
        }
    }

    /// Create a plain data-flow reference
    pub fn data(node: impl Into<NodeId>, column: impl Into<String>) -> Self {
        Self::new(node, column, EdgeKind::Data)
    }
}

/// Column metadata as documented or cataloged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Database type, when known
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Column description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Direct column lineage of a node.
///
/// `Unknown` covers sources (nothing is derived inside them) and models whose
/// SQL could not be analyzed. An `Unknown` node is never an error: traversal
/// simply stops there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnLineage {
    /// Lineage was not determined
    #[default]
    Unknown,
    /// Output column -> direct upstream references
    Known(BTreeMap<String, Vec<SourceRef>>),
}

impl ColumnLineage {
    /// Whether column-level lineage is available
    pub fn is_known(&self) -> bool {
        matches!(self, ColumnLineage::Known(_))
    }

    /// Direct upstream references of `column`, if the column has an entry
    pub fn sources(&self, column: &str) -> Option<&[SourceRef]> {
        match self {
            ColumnLineage::Known(map) => map.get(column).map(Vec::as_slice),
            ColumnLineage::Unknown => None,
        }
    }

    /// Iterate over `(output column, references)` entries
    pub fn entries(&self) -> impl Iterator<Item = (&String, &Vec<SourceRef>)> {
        let map = match self {
            ColumnLineage::Known(map) => Some(map),
            ColumnLineage::Unknown => None,
        };
        map.into_iter().flat_map(|m| m.iter())
    }

    /// Total number of one-hop references
    pub fn edge_count(&self) -> usize {
        self.entries().map(|(_, refs)| refs.len()).sum()
    }
}

/// A model or source in the dependency graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique id, `<kind>.<package>.<name>`
    pub id: NodeId,
    /// Node name
    pub name: String,
    /// Owning package
    #[serde(default)]
    pub package: String,
    /// File path relative to the project
    #[serde(default)]
    pub path: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Tags
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Kind-specific attributes
    #[serde(default)]
    pub details: NodeDetails,
    /// Direct upstream dependencies
    #[serde(default)]
    pub depends_on: Vec<NodeId>,
    /// Column metadata keyed by column name
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnMeta>,
    /// Direct column lineage
    #[serde(default)]
    pub column_lineage: ColumnLineage,
    /// Attributes not modeled above
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, serde_json::Value>,
}

impl Node {
    /// The node's resource kind
    pub fn resource_type(&self) -> NodeKind {
        self.details.kind()
    }

    /// Whether this node is a source
    pub fn is_source(&self) -> bool {
        self.resource_type() == NodeKind::Source
    }

    /// `(schema, table)` for source nodes
    pub fn source_table(&self) -> Option<(&str, &str)> {
        match &self.details {
            NodeDetails::Source { schema, table } => Some((schema.as_str(), table.as_str())),
            NodeDetails::Model { .. } => None,
        }
    }

    /// Resolve a column name to the spelling this node uses.
    ///
    /// A column exists if it is documented in `columns` or appears as an
    /// output column in `column_lineage`. Exact matches win; otherwise a
    /// single ASCII case-insensitive match is accepted. When `columns` and
    /// `column_lineage` spell the same column differently, the lineage
    /// spelling is returned so lineage lookups on the result succeed.
    pub fn resolve_column(&self, column: &str) -> Option<&str> {
        let names = self.column_names();
        if let Some(&exact) = names.get(column) {
            return Some(self.lineage_spelling(exact).unwrap_or(exact));
        }

        let matches: BTreeSet<&str> = names
            .iter()
            .filter(|name| name.eq_ignore_ascii_case(column))
            .map(|&name| self.lineage_spelling(name).unwrap_or(name))
            .collect();
        let mut matches = matches.into_iter();
        match (matches.next(), matches.next()) {
            (Some(name), None) => Some(name),
            _ => None,
        }
    }

    /// The `column_lineage` key for a documented column whose lineage entry
    /// differs only in ASCII case
    fn lineage_spelling(&self, name: &str) -> Option<&str> {
        let ColumnLineage::Known(map) = &self.column_lineage else {
            return None;
        };
        if map.contains_key(name) {
            return None;
        }
        let mut keys = map.keys().filter(|key| key.eq_ignore_ascii_case(name));
        match (keys.next(), keys.next()) {
            (Some(key), None) => Some(key.as_str()),
            _ => None,
        }
    }

    /// All column names known for this node, documented or derived
    pub fn column_names(&self) -> BTreeSet<&str> {
        self.columns
            .keys()
            .chain(self.column_lineage.entries().map(|(name, _)| name))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod tests;
