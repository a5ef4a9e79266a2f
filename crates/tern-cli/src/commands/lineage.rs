//! Lineage command implementation - column-level lineage across nodes

use anyhow::{Context, Result};
use std::collections::HashSet;
use tern_lineage::{
    ColumnKey, Direction, LineageEdge, LineageResolver, LineageResult, LineageTree, ResolveOptions,
};

use crate::cli::{GlobalArgs, LineageArgs, LineageDirection, LineageOutput};
use crate::commands::common::{print_json, print_table};
use crate::context::ProjectContext;

/// Execute the lineage command
pub(crate) fn execute(args: &LineageArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;

    let mut options = ResolveOptions::from(&ctx.config.lineage);
    options.include_structural |= args.include_structural;
    if let Some(max_depth) = args.max_depth {
        if max_depth == 0 {
            anyhow::bail!("--max-depth must be at least 1");
        }
        options.max_depth = Some(max_depth);
    }

    let mut resolver = LineageResolver::new(&ctx.store).with_options(options);
    if ctx.has_selectors(&args.select) {
        resolver = resolver.with_scope(ctx.selection(&args.select)?);
    }

    let directions: &[Direction] = match args.direction {
        LineageDirection::Upstream => &[Direction::Ancestors],
        LineageDirection::Downstream => &[Direction::Descendants],
        LineageDirection::Both => &[Direction::Ancestors, Direction::Descendants],
    };

    let results = directions
        .iter()
        .map(|&direction| resolver.resolve(&args.node, &args.column, direction))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to resolve lineage of {}.{}", args.node, args.column))?;

    match args.output {
        LineageOutput::Json => print_json(&results)?,
        LineageOutput::Table => results.iter().for_each(print_edges),
        LineageOutput::Tree => results.iter().for_each(|r| print_tree(&r.tree())),
    }

    Ok(())
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Ancestors => "upstream",
        Direction::Descendants => "downstream",
    }
}

/// Print the followed edges, nearest first
fn print_edges(result: &LineageResult) {
    let label = direction_label(result.direction);
    if result.edges.is_empty() {
        println!("No {} lineage found for {}.", label, result.root);
        return;
    }

    println!("{} lineage of {}\n", capitalize(label), result.root);

    let depth_of = |key: &ColumnKey| -> usize {
        if *key == result.root {
            return 0;
        }
        result
            .get(&key.node, &key.column)
            .map_or(0, |entry| entry.depth)
    };
    let mut edges: Vec<&LineageEdge> = result.edges.iter().collect();
    edges.sort_by_key(|e| depth_of(&e.from).max(depth_of(&e.to)));

    let rows: Vec<Vec<String>> = edges
        .iter()
        .map(|edge| {
            vec![
                edge.from.node.to_string(),
                edge.from.column.clone(),
                edge.to.node.to_string(),
                edge.to.column.clone(),
                edge.kind.to_string(),
            ]
        })
        .collect();
    print_table(
        &[
            "SOURCE NODE",
            "SOURCE COLUMN",
            "TARGET NODE",
            "TARGET COLUMN",
            "KIND",
        ],
        &rows,
    );

    let terminals = result.terminals().count();
    println!(
        "\n{} column(s) reached, {} edge(s), {} without further lineage.\n",
        result.len(),
        result.edges.len(),
        terminals
    );
}

/// Print the squashed tree, each column once; repeats are marked
fn print_tree(tree: &LineageTree) {
    println!("{} ({})", tree.root, direction_label(tree.direction));
    let mut printed = HashSet::from([tree.root.clone()]);
    print_children(tree, &tree.root, 1, &mut printed);
    println!();
}

fn print_children(
    tree: &LineageTree,
    key: &ColumnKey,
    indent: usize,
    printed: &mut HashSet<ColumnKey>,
) {
    for next in tree.next(key) {
        let pad = "  ".repeat(indent);
        if !printed.insert(next.clone()) {
            println!("{}{} (see above)", pad, next);
            continue;
        }
        let marker = match tree.node(next) {
            Some(node) if node.terminal => " *",
            _ => "",
        };
        println!("{}{}{}", pad, next, marker);
        print_children(tree, next, indent + 1, printed);
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
