//! Validate command implementation - report references to unknown nodes

use anyhow::Result;

use crate::cli::{GlobalArgs, ValidateArgs};
use crate::commands::common::{print_table, ExitCode};
use crate::context::ProjectContext;

/// Execute the validate command
pub(crate) fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    // Always lenient so every dropped reference is listed, not just the first
    let ctx = ProjectContext::load_lenient(global)?;
    let malformed = ctx.store.malformed();

    if malformed.is_empty() {
        println!(
            "Graph OK: {} nodes, {} dependency edges.",
            ctx.store.len(),
            ctx.store.edge_count()
        );
        return Ok(());
    }

    let rows: Vec<Vec<String>> = malformed
        .iter()
        .map(|m| {
            vec![
                m.from.to_string(),
                m.origin.to_string(),
                m.target.to_string(),
            ]
        })
        .collect();
    print_table(&["NODE", "REFERENCE", "UNKNOWN TARGET"], &rows);
    println!("\n{} reference(s) to unknown nodes.", malformed.len());

    if args.allow_dropped {
        return Ok(());
    }
    Err(ExitCode(1).into())
}
