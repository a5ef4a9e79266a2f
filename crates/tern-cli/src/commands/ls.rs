//! List command implementation

use anyhow::Result;
use serde::Serialize;
use tern_core::Node;

use crate::cli::{GlobalArgs, LsArgs, LsOutput};
use crate::commands::common::{or_dash, print_json, print_table};
use crate::context::ProjectContext;

/// Execute the ls command
pub(crate) fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let selection = ctx.selection(&args.select)?;

    let nodes: Vec<NodeInfo> = selection.nodes(&ctx.store).map(NodeInfo::from).collect();

    match args.output {
        LsOutput::Table => print_nodes(&nodes),
        LsOutput::Json => print_json(&nodes)?,
    }

    Ok(())
}

/// Node information for display
#[derive(Debug, Serialize)]
struct NodeInfo<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(rename = "type")]
    resource_type: &'static str,
    package: &'a str,
    path: &'a str,
    tags: Vec<&'a str>,
    depends_on: Vec<&'a str>,
}

impl<'a> From<&'a Node> for NodeInfo<'a> {
    fn from(node: &'a Node) -> Self {
        Self {
            id: &node.id,
            name: &node.name,
            resource_type: node.resource_type().label(),
            package: &node.package,
            path: &node.path,
            tags: node.tags.iter().map(String::as_str).collect(),
            depends_on: node.depends_on.iter().map(|d| d.as_str()).collect(),
        }
    }
}

fn print_nodes(nodes: &[NodeInfo]) {
    if nodes.is_empty() {
        println!("No nodes selected.");
        return;
    }

    let rows: Vec<Vec<String>> = nodes
        .iter()
        .map(|n| {
            vec![
                n.name.to_string(),
                n.resource_type.to_string(),
                or_dash(n.package),
                or_dash(&n.tags.join(",")),
                or_dash(&n.depends_on.join(", ")),
            ]
        })
        .collect();
    print_table(&["NAME", "TYPE", "PACKAGE", "TAGS", "DEPENDS_ON"], &rows);

    let model_count = nodes.iter().filter(|n| n.resource_type == "model").count();
    let source_count = nodes.len() - model_count;
    println!(
        "\n{} node(s): {} model(s), {} source(s)",
        nodes.len(),
        model_count,
        source_count
    );
}
