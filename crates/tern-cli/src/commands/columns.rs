//! Columns command implementation - find nodes exposing a column

use anyhow::Result;
use tern_core::nodes_with_column;

use crate::cli::{ColumnsArgs, GlobalArgs};
use crate::commands::common::print_table;
use crate::context::ProjectContext;

/// Execute the columns command
pub(crate) fn execute(args: &ColumnsArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let found = nodes_with_column(&ctx.store, &args.column);

    if found.is_empty() {
        println!("No node has a column named '{}'.", args.column);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = found
        .iter()
        .map(|(node, column)| {
            let meta = node.columns.get(*column);
            vec![
                node.id.to_string(),
                column.to_string(),
                meta.and_then(|m| m.data_type.clone())
                    .unwrap_or_else(|| "-".to_string()),
                meta.and_then(|m| m.description.clone())
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    print_table(&["NODE", "COLUMN", "TYPE", "DESCRIPTION"], &rows);
    println!("\n{} node(s) found.", found.len());

    Ok(())
}
