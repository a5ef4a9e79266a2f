use super::*;
use crate::node::EdgeKind;
use crate::testing::{model, orders_graph, source};

fn ids(nodes: Vec<&Node>) -> Vec<&str> {
    nodes.into_iter().map(|n| n.id.as_str()).collect()
}

fn described_graph() -> GraphStore {
    GraphStore::build(vec![
        source("shop", "raw", "customers")
            .description("Customer master data")
            .build(),
        model("shop", "dim_customers")
            .description("One row per customer")
            .depends_on(&["source.shop.raw.customers"])
            .build(),
        model("shop", "fct_orders").description("Order facts").build(),
    ])
    .unwrap()
}

#[test]
fn test_search_matches_name_and_description() {
    let store = described_graph();
    assert_eq!(
        ids(search_nodes(&store, "CUSTOMER", None)),
        vec!["source.shop.raw.customers", "model.shop.dim_customers"]
    );
    assert_eq!(
        ids(search_nodes(&store, "facts", None)),
        vec!["model.shop.fct_orders"]
    );
}

#[test]
fn test_search_kind_filter() {
    let store = described_graph();
    assert_eq!(
        ids(search_nodes(&store, "customer", Some(NodeKind::Model))),
        vec!["model.shop.dim_customers"]
    );
    assert_eq!(
        ids(search_nodes(&store, "customer", Some(NodeKind::Source))),
        vec!["source.shop.raw.customers"]
    );
}

#[test]
fn test_search_no_match() {
    let store = described_graph();
    assert!(search_nodes(&store, "inventory", None).is_empty());
}

#[test]
fn test_nodes_with_column() {
    let store = orders_graph();
    let found: Vec<(&str, &str)> = nodes_with_column(&store, "amount")
        .into_iter()
        .map(|(n, c)| (n.id.as_str(), c))
        .collect();
    assert_eq!(
        found,
        vec![
            ("source.shop.raw.orders", "amount"),
            ("model.shop.stg_orders", "amount")
        ]
    );
}

#[test]
fn test_nodes_with_column_ignores_case() {
    let store = orders_graph();
    let found = nodes_with_column(&store, "ORDER_ID");
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|(_, c)| *c == "order_id"));
}

#[test]
fn test_summary_of_orders_graph() {
    let summary = GraphSummary::from_store(&orders_graph());
    assert_eq!(summary.models, 2);
    assert_eq!(summary.sources, 1);
    assert_eq!(summary.packages, BTreeSet::from(["shop".to_string()]));
    assert_eq!(summary.columns, 7);
    assert_eq!(summary.dependency_edges, 2);
    assert_eq!(summary.lineage_edges, 4);
    assert_eq!(summary.structural_edges, 0);
    assert_eq!(summary.unknown_lineage, 0);
    assert_eq!(summary.malformed_references, 0);
}

#[test]
fn test_summary_counts_structural_and_unknown() {
    let store = GraphStore::build(vec![
        model("pkg", "a").columns(&["id", "flag"]).build(),
        model("pkg", "b")
            .depends_on(&["model.pkg.a", "model.pkg.ghost"])
            .lineage("id", &[("model.pkg.a", "id")])
            .edge("id", "model.pkg.a", "flag", EdgeKind::Filter)
            .build(),
    ])
    .unwrap();

    let summary = GraphSummary::from_store(&store);
    assert_eq!(summary.lineage_edges, 1);
    assert_eq!(summary.structural_edges, 1);
    // a has no computed lineage
    assert_eq!(summary.unknown_lineage, 1);
    assert_eq!(summary.malformed_references, 1);
}

#[test]
fn test_summary_serializes() {
    let json = serde_json::to_value(GraphSummary::from_store(&orders_graph())).unwrap();
    assert_eq!(json["models"], 2);
    assert_eq!(json["packages"], serde_json::json!(["shop"]));
}
