//! Search command implementation

use anyhow::Result;
use tern_core::{search_nodes, NodeKind};

use crate::cli::{GlobalArgs, KindFilter, SearchArgs};
use crate::commands::common::{or_dash, print_table};
use crate::context::ProjectContext;

/// Execute the search command
pub(crate) fn execute(args: &SearchArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;

    let kind = args.kind.map(|k| match k {
        KindFilter::Model => NodeKind::Model,
        KindFilter::Source => NodeKind::Source,
    });
    let found = search_nodes(&ctx.store, &args.query, kind);

    if found.is_empty() {
        println!("No nodes match '{}'.", args.query);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = found
        .iter()
        .map(|node| {
            vec![
                node.id.to_string(),
                node.resource_type().to_string(),
                or_dash(&node.description),
            ]
        })
        .collect();
    print_table(&["ID", "TYPE", "DESCRIPTION"], &rows);
    println!("\n{} node(s) found.", found.len());

    Ok(())
}
