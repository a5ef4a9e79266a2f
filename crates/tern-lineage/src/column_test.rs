use super::*;

fn key(node: &str, column: &str) -> ColumnKey {
    ColumnKey::new(node, column)
}

fn edge(from: ColumnKey, to: ColumnKey) -> LineageEdge {
    LineageEdge {
        from,
        to,
        kind: EdgeKind::Data,
    }
}

/// `a.x` and `b.y` both feed `c.z`; `a.x` also feeds `b.y`
fn diamond() -> LineageResult {
    let (ax, by, cz) = (key("a", "x"), key("b", "y"), key("c", "z"));
    LineageResult {
        root: cz.clone(),
        direction: Direction::Ancestors,
        columns: vec![
            LineageEntry {
                key: by.clone(),
                depth: 1,
                terminal: false,
            },
            LineageEntry {
                key: ax.clone(),
                depth: 1,
                terminal: true,
            },
        ],
        edges: vec![
            edge(by.clone(), cz.clone()),
            edge(ax.clone(), cz.clone()),
            edge(ax.clone(), by.clone()),
        ],
    }
}

#[test]
fn test_result_lookup() {
    let result = diamond();
    assert_eq!(result.len(), 2);
    assert!(result.contains("a", "x"));
    assert!(!result.contains("c", "z"));
    assert_eq!(result.get("b", "y").unwrap().depth, 1);
    let terminals: Vec<_> = result.terminals().map(|e| e.key.to_string()).collect();
    assert_eq!(terminals, vec!["a.x"]);
}

#[test]
fn test_result_nodes_are_distinct() {
    let mut result = diamond();
    result.columns.push(LineageEntry {
        key: key("a", "w"),
        depth: 2,
        terminal: true,
    });
    let nodes: Vec<&str> = result.nodes().into_iter().map(|n| n.as_str()).collect();
    assert_eq!(nodes, vec!["b", "a"]);
}

#[test]
fn test_tree_squashes_shared_columns() {
    let tree = diamond().tree();
    assert_eq!(tree.nodes.len(), 3);
    assert_eq!(tree.nodes[0].key, key("c", "z"));
    assert_eq!(tree.nodes[0].depth, 0);

    // a.x appears once, with both of its children
    let ax = tree.node(&key("a", "x")).unwrap();
    assert_eq!(ax.children, vec![key("c", "z"), key("b", "y")]);
    assert!(ax.parents.is_empty());

    assert_eq!(
        tree.next(&key("c", "z")),
        &[key("b", "y"), key("a", "x")]
    );
    assert_eq!(tree.next(&key("b", "y")), &[key("a", "x")]);
    assert!(tree.next(&key("zz", "zz")).is_empty());
}

#[test]
fn test_tree_of_empty_result() {
    let result = LineageResult {
        root: key("a", "x"),
        direction: Direction::Descendants,
        columns: Vec::new(),
        edges: Vec::new(),
    };
    let tree = result.tree();
    assert_eq!(tree.nodes.len(), 1);
    assert!(tree.nodes[0].terminal);
}

#[test]
fn test_key_display() {
    assert_eq!(
        key("model.shop.fct_orders", "total").to_string(),
        "model.shop.fct_orders.total"
    );
}

#[test]
fn test_result_serializes() {
    let json = serde_json::to_value(diamond()).unwrap();
    assert_eq!(json["direction"], "ancestors");
    assert_eq!(json["root"]["node"], "c");
    assert_eq!(json["edges"][0]["kind"], "data");
}
