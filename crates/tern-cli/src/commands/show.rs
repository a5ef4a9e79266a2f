//! Show command implementation - one node's attributes, columns and lineage

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use tern_core::{ColumnMeta, Node, NodeDetails};

use crate::cli::{GlobalArgs, LsOutput, ShowArgs};
use crate::commands::common::{or_dash, print_json, print_table};
use crate::context::ProjectContext;

/// A column with its documentation and direct upstream references
#[derive(Debug, Serialize)]
struct ColumnInfo<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    data_type: Option<&'a str>,
    description: Option<&'a str>,
    derived_from: Vec<String>,
}

/// Execute the show command
pub(crate) fn execute(args: &ShowArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let node = ctx
        .store
        .resolve(&args.node)
        .with_context(|| format!("Failed to look up '{}'", args.node))?;

    if let Some(column) = &args.column {
        let name = node.resolve_column(column).with_context(|| {
            format!("Column '{}' not found on node '{}'", column, node.id)
        })?;
        let info = column_info(node, name);
        match args.output {
            LsOutput::Json => print_json(&info)?,
            LsOutput::Table => print_columns(&[info]),
        }
        return Ok(());
    }

    match args.output {
        LsOutput::Json => print_json(node)?,
        LsOutput::Table => print_node(node),
    }
    Ok(())
}

fn column_info<'a>(node: &'a Node, name: &'a str) -> ColumnInfo<'a> {
    let meta = documented(node, name);
    let derived_from = node
        .column_lineage
        .sources(name)
        .unwrap_or_default()
        .iter()
        .map(|source| {
            if source.kind.is_structural() {
                format!("{}.{} ({})", source.node, source.column, source.kind)
            } else {
                format!("{}.{}", source.node, source.column)
            }
        })
        .collect();

    ColumnInfo {
        name,
        data_type: meta.and_then(|m| m.data_type.as_deref()),
        description: meta.and_then(|m| m.description.as_deref()),
        derived_from,
    }
}

/// Column metadata, matching the documented name case-insensitively when the
/// lineage spells it differently
fn documented<'a>(node: &'a Node, name: &str) -> Option<&'a ColumnMeta> {
    node.columns.get(name).or_else(|| {
        node.columns
            .iter()
            .find(|(documented, _)| documented.eq_ignore_ascii_case(name))
            .map(|(_, meta)| meta)
    })
}

fn print_node(node: &Node) {
    println!("ID:            {}", node.id);
    println!("Type:          {}", node.resource_type());
    println!("Package:       {}", or_dash(&node.package));
    println!("Path:          {}", or_dash(&node.path));
    println!("Description:   {}", or_dash(&node.description));
    let tags: Vec<&str> = node.tags.iter().map(String::as_str).collect();
    println!("Tags:          {}", or_dash(&tags.join(", ")));
    let deps: Vec<&str> = node.depends_on.iter().map(|d| d.as_str()).collect();
    println!("Depends on:    {}", or_dash(&deps.join(", ")));
    match &node.details {
        NodeDetails::Model { materialized, .. } => {
            println!("Materialized:  {}", materialized.as_deref().unwrap_or("-"));
        }
        NodeDetails::Source { schema, table } => {
            println!("Source table:  {}.{}", schema, table);
        }
    }
    if !node.column_lineage.is_known() {
        println!("Lineage:       unknown");
    }
    println!();

    // Documented and lineage spellings of one column collapse to one row
    let names: BTreeSet<&str> = node
        .column_names()
        .into_iter()
        .filter_map(|name| node.resolve_column(name))
        .collect();
    let columns: Vec<ColumnInfo> = names.into_iter().map(|name| column_info(node, name)).collect();

    if columns.is_empty() {
        println!("No columns documented.");
    } else {
        print_columns(&columns);
    }
}

fn print_columns(columns: &[ColumnInfo]) {
    let rows: Vec<Vec<String>> = columns
        .iter()
        .map(|c| {
            vec![
                c.name.to_string(),
                c.data_type.unwrap_or("-").to_string(),
                c.description.unwrap_or("-").to_string(),
                or_dash(&c.derived_from.join(", ")),
            ]
        })
        .collect();
    print_table(&["COLUMN", "TYPE", "DESCRIPTION", "DERIVED FROM"], &rows);
}
