//! Integration tests for the tern CLI against the sample project fixture

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use tern_core::{Config, GraphDocument};

const FIXTURE: &str = "tests/fixtures/sample_project";

/// Path to the compiled tern binary
fn tern_bin() -> String {
    env!("CARGO_BIN_EXE_tern").to_string()
}

/// Run a `tern` CLI command against the fixture and return
/// (stdout, stderr, exit code).
fn run_tern(args: &[&str]) -> (String, String, Option<i32>) {
    let output = Command::new(tern_bin())
        .args(["--project-dir", FIXTURE])
        .args(args)
        .env_remove("TERN_GRAPH")
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute tern with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code(),
    )
}

fn run_json(args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_tern(args);
    assert_eq!(code, Some(0), "tern {:?} failed: {}", args, stderr);
    serde_json::from_str(stdout.trim())
        .unwrap_or_else(|e| panic!("Invalid JSON from tern {:?}: {}\n{}", args, e, stdout))
}

fn ids(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .expect("array of nodes")
        .iter()
        .map(|n| n["id"].as_str().unwrap().to_string())
        .collect()
}

fn reached(result: &serde_json::Value) -> Vec<String> {
    result["columns"]
        .as_array()
        .expect("columns array")
        .iter()
        .map(|c| format!("{}.{}", c["key"]["node"].as_str().unwrap(), c["key"]["column"].as_str().unwrap()))
        .collect()
}

// ── Graph document ──────────────────────────────────────────────────────

#[test]
fn test_fixture_graph_loads() {
    let config = Config::load_from_dir(Path::new(FIXTURE)).unwrap();
    let doc = GraphDocument::load(&config.graph_path_absolute(Path::new(FIXTURE))).unwrap();
    assert_eq!(doc.project_name(), Some("shop"));

    let store = doc.into_store(config.strict).unwrap();
    assert_eq!(store.len(), 7);
    assert_eq!(store.malformed().len(), 1);
    assert_eq!(store.malformed()[0].target.as_str(), "model.shop.legacy_orders");
}

// ── ls ──────────────────────────────────────────────────────────────────

#[test]
fn test_ls_lists_all_nodes() {
    let nodes = run_json(&["ls", "-o", "json"]);
    assert_eq!(nodes.as_array().unwrap().len(), 7);
    assert_eq!(nodes[0]["id"], "source.shop.raw.orders");
    assert_eq!(nodes[0]["type"], "source");
}

#[test]
fn test_ls_ancestor_selector() {
    let nodes = run_json(&["ls", "-o", "json", "-s", "+fct_orders"]);
    assert_eq!(
        ids(&nodes),
        vec![
            "source.shop.raw.orders",
            "source.shop.raw.customers",
            "model.shop.stg_orders",
            "model.shop.stg_customers",
            "model.shop.fct_orders"
        ]
    );
}

#[test]
fn test_ls_descendant_selector() {
    let nodes = run_json(&["ls", "-o", "json", "-s", "fct_orders+"]);
    assert_eq!(
        ids(&nodes),
        vec!["model.shop.fct_orders", "model.shop.customer_revenue"]
    );
}

#[test]
fn test_ls_intersection_and_union() {
    let nodes = run_json(&["ls", "-o", "json", "-s", "tag:staging,stg_orders+ resource_type:source"]);
    assert_eq!(
        ids(&nodes),
        vec![
            "source.shop.raw.orders",
            "source.shop.raw.customers",
            "model.shop.stg_orders"
        ]
    );
}

#[test]
fn test_ls_repeated_selectors_union() {
    let nodes = run_json(&["ls", "-o", "json", "-s", "source.raw.orders", "-s", "path:models/marts/*"]);
    assert_eq!(
        ids(&nodes),
        vec![
            "source.shop.raw.orders",
            "model.shop.fct_orders",
            "model.shop.customer_revenue"
        ]
    );
}

#[test]
fn test_ls_table_output() {
    let (stdout, _, code) = run_tern(&["ls", "-s", "tag:finance"]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("NAME"));
    assert!(stdout.contains("fct_orders"));
    assert!(stdout.contains("customer_revenue"));
    assert!(stdout.contains("2 node(s)"));
}

#[test]
fn test_ls_malformed_selector_fails() {
    let (_, stderr, code) = run_tern(&["ls", "-s", "tag:,finance"]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("[E009]"), "stderr: {}", stderr);
    assert!(stderr.contains("dangling comma"), "stderr: {}", stderr);
}

#[test]
fn test_ls_unmatched_selector_is_empty() {
    let (stdout, _, code) = run_tern(&["ls", "-s", "does_not_exist"]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("No nodes selected"));
}

// ── lineage ─────────────────────────────────────────────────────────────

#[test]
fn test_lineage_upstream() {
    let results = run_json(&[
        "lineage",
        "--node",
        "customer_revenue",
        "--column",
        "revenue",
        "-o",
        "json",
    ]);
    let result = &results[0];
    assert_eq!(result["direction"], "ancestors");
    assert_eq!(
        reached(result),
        vec![
            "model.shop.fct_orders.total",
            "model.shop.stg_orders.amount",
            "source.shop.raw.orders.amount"
        ]
    );
    assert_eq!(result["columns"][2]["terminal"], true);
    assert_eq!(result["columns"][2]["depth"], 3);
}

#[test]
fn test_lineage_structural_edges() {
    let results = run_json(&[
        "lineage",
        "--node",
        "fct_orders",
        "--column",
        "total",
        "--include-structural",
        "-o",
        "json",
    ]);
    assert_eq!(
        reached(&results[0]),
        vec![
            "model.shop.stg_orders.amount",
            "model.shop.stg_orders.status",
            "source.shop.raw.orders.amount",
            "source.shop.raw.orders.status"
        ]
    );
}

#[test]
fn test_lineage_downstream() {
    let results = run_json(&[
        "lineage",
        "--node",
        "source.shop.raw.orders",
        "--column",
        "amount",
        "-d",
        "downstream",
        "-o",
        "json",
    ]);
    assert_eq!(
        reached(&results[0]),
        vec![
            "model.shop.stg_orders.amount",
            "model.shop.fct_orders.total",
            "model.shop.customer_revenue.revenue"
        ]
    );
}

#[test]
fn test_lineage_both_directions() {
    let results = run_json(&[
        "lineage",
        "--node",
        "fct_orders",
        "--column",
        "customer_name",
        "-d",
        "both",
        "-o",
        "json",
    ]);
    assert_eq!(results.as_array().unwrap().len(), 2);
    assert_eq!(
        reached(&results[0]),
        vec![
            "model.shop.stg_customers.customer_name",
            "source.shop.raw.customers.name"
        ]
    );
    assert_eq!(
        reached(&results[1]),
        vec!["model.shop.customer_revenue.customer_name"]
    );
}

#[test]
fn test_lineage_scoped_by_selector() {
    let results = run_json(&[
        "lineage",
        "--node",
        "customer_revenue",
        "--column",
        "revenue",
        "-s",
        "tag:finance",
        "-o",
        "json",
    ]);
    assert_eq!(reached(&results[0]), vec!["model.shop.fct_orders.total"]);
    assert_eq!(results[0]["columns"][0]["terminal"], true);
}

#[test]
fn test_lineage_max_depth() {
    let results = run_json(&[
        "lineage",
        "--node",
        "customer_revenue",
        "--column",
        "revenue",
        "--max-depth",
        "1",
        "-o",
        "json",
    ]);
    assert_eq!(reached(&results[0]), vec!["model.shop.fct_orders.total"]);
    assert_eq!(results[0]["columns"][0]["terminal"], false);
}

#[test]
fn test_lineage_tree_output() {
    let (stdout, _, code) = run_tern(&[
        "lineage",
        "--node",
        "fct_orders",
        "--column",
        "total",
        "-o",
        "tree",
    ]);
    assert_eq!(code, Some(0));
    assert!(stdout.starts_with("model.shop.fct_orders.total (upstream)"));
    assert!(stdout.contains("  model.shop.stg_orders.amount"));
    assert!(stdout.contains("    source.shop.raw.orders.amount *"));
}

#[test]
fn test_lineage_table_output() {
    let (stdout, _, code) = run_tern(&[
        "lineage",
        "--node",
        "fct_orders",
        "--column",
        "total",
    ]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("SOURCE NODE"));
    assert!(stdout.contains("2 column(s) reached, 2 edge(s)"));
}

#[test]
fn test_lineage_unknown_column_fails() {
    let (_, stderr, code) = run_tern(&[
        "lineage",
        "--node",
        "fct_orders",
        "--column",
        "revenue",
    ]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("[L002]"), "stderr: {}", stderr);
}

#[test]
fn test_lineage_unknown_node_fails() {
    let (_, stderr, code) = run_tern(&["lineage", "--node", "nope", "--column", "id"]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("[L001]"), "stderr: {}", stderr);
}

#[test]
fn test_lineage_start_outside_scope_fails() {
    let (_, stderr, code) = run_tern(&[
        "lineage",
        "--node",
        "stg_orders",
        "--column",
        "amount",
        "-s",
        "tag:finance",
    ]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("[L003]"), "stderr: {}", stderr);
}

// ── search / columns / summary ──────────────────────────────────────────

#[test]
fn test_search_by_description() {
    let (stdout, _, code) = run_tern(&["search", "CUSTOMER", "--kind", "model"]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("model.shop.stg_customers"));
    assert!(stdout.contains("model.shop.fct_orders"));
    assert!(stdout.contains("model.shop.customer_revenue"));
    assert!(!stdout.contains("source.shop.raw.customers"));
    assert!(stdout.contains("3 node(s) found."));
}

#[test]
fn test_columns_finder() {
    let (stdout, _, code) = run_tern(&["columns", "Customer_Name"]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("model.shop.stg_customers"));
    assert!(stdout.contains("model.shop.fct_orders"));
    assert!(stdout.contains("model.shop.customer_revenue"));
    assert!(stdout.contains("3 node(s) found."));
}

#[test]
fn test_summary_json() {
    let summary = run_json(&["summary", "-o", "json"]);
    assert_eq!(summary["project"], "shop");
    assert_eq!(summary["models"], 5);
    assert_eq!(summary["sources"], 2);
    assert_eq!(summary["structural_edges"], 3);
    assert_eq!(summary["unknown_lineage"], 1);
    assert_eq!(summary["malformed_references"], 1);
}

// ── show ────────────────────────────────────────────────────────────────

#[test]
fn test_show_node() {
    let (stdout, _, code) = run_tern(&["show", "fct_orders"]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("ID:            model.shop.fct_orders"));
    assert!(stdout.contains("Materialized:  table"));
    assert!(stdout.contains("model.shop.stg_orders, model.shop.stg_customers"));
    assert!(stdout.contains("DERIVED FROM"));
    assert!(stdout.contains("model.shop.stg_orders.amount, model.shop.stg_orders.status (filter)"));
}

#[test]
fn test_show_single_column() {
    let info = run_json(&["show", "fct_orders", "--column", "TOTAL", "-o", "json"]);
    assert_eq!(info["name"], "total");
    assert_eq!(info["type"], "decimal(10,2)");
    assert_eq!(info["description"], "Order total");
    assert_eq!(
        info["derived_from"],
        serde_json::json!(["model.shop.stg_orders.amount", "model.shop.stg_orders.status (filter)"])
    );
}

#[test]
fn test_show_node_json() {
    let node = run_json(&["show", "order_snapshot", "-o", "json"]);
    assert_eq!(node["id"], "model.shop.order_snapshot");
    assert_eq!(node["column_lineage"], "unknown");
    assert_eq!(node["meta"]["owner"], "data-platform");
}

#[test]
fn test_show_unknown_node_fails() {
    let (_, stderr, code) = run_tern(&["show", "nope"]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("[E004]"), "stderr: {}", stderr);

    let (_, stderr, code) = run_tern(&["show", "fct_orders", "--column", "nope"]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("Column 'nope' not found"), "stderr: {}", stderr);
}

// ── validate / config ───────────────────────────────────────────────────

#[test]
fn test_validate_reports_dropped_reference() {
    let (stdout, _, code) = run_tern(&["validate"]);
    assert_eq!(code, Some(1));
    assert!(stdout.contains("model.shop.customer_revenue"));
    assert!(stdout.contains("model.shop.legacy_orders"));
    assert!(stdout.contains("depends_on"));
}

#[test]
fn test_validate_allow_dropped() {
    let (_, _, code) = run_tern(&["validate", "--allow-dropped"]);
    assert_eq!(code, Some(0));
}

#[test]
fn test_strict_config_rejects_dropped_reference() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("tern.yml");
    std::fs::write(&config_path, "strict: true\n").unwrap();
    let graph = Path::new(FIXTURE).join("target/graph.json");

    let (_, stderr, code) = run_tern(&[
        "--config",
        config_path.to_str().unwrap(),
        "--graph",
        graph.to_str().unwrap(),
        "ls",
    ]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("legacy_orders"), "stderr: {}", stderr);
}

#[test]
fn test_missing_graph_document() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(tern_bin())
        .args(["--project-dir", dir.path().to_str().unwrap(), "ls"])
        .env_remove("TERN_GRAPH")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[E003]"), "stderr: {}", stderr);
}
