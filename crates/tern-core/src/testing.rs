//! Fixture builders shared by tern test suites

use crate::graph::GraphStore;
use crate::node::{ColumnLineage, ColumnMeta, EdgeKind, Node, NodeDetails, SourceRef};
use crate::node_id::NodeId;
use std::collections::BTreeMap;

/// Fluent builder for [`Node`] fixtures
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    node: Node,
}

/// Start a model node with id `model.<package>.<name>`
pub fn model(package: &str, name: &str) -> NodeBuilder {
    NodeBuilder {
        node: Node {
            id: NodeId::new(format!("model.{}.{}", package, name)),
            name: name.to_string(),
            package: package.to_string(),
            path: format!("models/{}.sql", name),
            description: String::new(),
            tags: Default::default(),
            details: NodeDetails::default(),
            depends_on: Vec::new(),
            columns: BTreeMap::new(),
            column_lineage: ColumnLineage::Unknown,
            meta: BTreeMap::new(),
        },
    }
}

/// Start a source node with id `source.<package>.<schema>.<table>`
pub fn source(package: &str, schema: &str, table: &str) -> NodeBuilder {
    let mut builder = model(package, table);
    builder.node.id = NodeId::new(format!("source.{}.{}.{}", package, schema, table));
    builder.node.path = format!("models/sources/{}.yml", schema);
    builder.node.details = NodeDetails::Source {
        schema: schema.to_string(),
        table: table.to_string(),
    };
    builder
}

impl NodeBuilder {
    /// Set the file path
    pub fn path(mut self, path: &str) -> Self {
        self.node.path = path.to_string();
        self
    }

    /// Set the description
    pub fn description(mut self, description: &str) -> Self {
        self.node.description = description.to_string();
        self
    }

    /// Add a tag
    pub fn tag(mut self, tag: &str) -> Self {
        self.node.tags.insert(tag.to_string());
        self
    }

    /// Add direct dependencies
    pub fn depends_on(mut self, ids: &[&str]) -> Self {
        self.node.depends_on.extend(ids.iter().map(|id| NodeId::from(*id)));
        self
    }

    /// Document columns
    pub fn columns(mut self, names: &[&str]) -> Self {
        for name in names {
            self.node
                .columns
                .insert(name.to_string(), ColumnMeta::default());
        }
        self
    }

    /// Add data-flow lineage `column <- (node, column)...`
    pub fn lineage(self, column: &str, sources: &[(&str, &str)]) -> Self {
        let refs = sources
            .iter()
            .map(|(node, col)| SourceRef::data(*node, *col))
            .collect();
        self.lineage_refs(column, refs)
    }

    /// Add a single lineage reference of the given kind
    pub fn edge(self, column: &str, node: &str, source_column: &str, kind: EdgeKind) -> Self {
        self.lineage_refs(column, vec![SourceRef::new(node, source_column, kind)])
    }

    fn lineage_refs(mut self, column: &str, refs: Vec<SourceRef>) -> Self {
        if !self.node.column_lineage.is_known() {
            self.node.column_lineage = ColumnLineage::Known(BTreeMap::new());
        }
        if let ColumnLineage::Known(map) = &mut self.node.column_lineage {
            map.entry(column.to_string()).or_default().extend(refs);
        }
        self
    }

    /// Finish the node
    pub fn build(self) -> Node {
        self.node
    }
}

/// `source.shop.raw.orders -> stg_orders -> fct_orders`
///
/// `fct_orders.total = stg_orders.amount`, `stg_orders.amount = raw.orders.amount`.
pub fn orders_graph() -> GraphStore {
    GraphStore::build(vec![
        source("shop", "raw", "orders")
            .columns(&["id", "amount", "status"])
            .build(),
        model("shop", "stg_orders")
            .depends_on(&["source.shop.raw.orders"])
            .tag("staging")
            .columns(&["order_id", "amount"])
            .lineage("order_id", &[("source.shop.raw.orders", "id")])
            .lineage("amount", &[("source.shop.raw.orders", "amount")])
            .build(),
        model("shop", "fct_orders")
            .depends_on(&["model.shop.stg_orders"])
            .tag("finance")
            .path("models/marts/fct_orders.sql")
            .columns(&["order_id", "total"])
            .lineage("order_id", &[("model.shop.stg_orders", "order_id")])
            .lineage("total", &[("model.shop.stg_orders", "amount")])
            .build(),
    ])
    .expect("orders fixture is well formed")
}

/// Five nodes used for set-precedence checks:
///
/// ```text
/// a (tag:x)        b (tag:x, tag:y)      c (tag:y)
///       \             /       \
///        d (tag:x)  ---        e (tag:z)
/// ```
///
/// `d` depends on `a` and `b`; `e` depends on `b` and `c`.
pub fn five_node_graph() -> GraphStore {
    GraphStore::build(vec![
        model("pkg", "a").tag("x").build(),
        model("pkg", "b").tag("x").tag("y").build(),
        model("pkg", "c").tag("y").path("models/staging/c.sql").build(),
        model("pkg", "d")
            .tag("x")
            .depends_on(&["model.pkg.a", "model.pkg.b"])
            .build(),
        model("other", "e")
            .tag("z")
            .depends_on(&["model.pkg.b", "model.pkg.c"])
            .build(),
    ])
    .expect("five node fixture is well formed")
}
