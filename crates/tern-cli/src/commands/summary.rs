//! Summary command implementation

use anyhow::Result;
use serde::Serialize;
use tern_core::GraphSummary;

use crate::cli::{GlobalArgs, LsOutput, SummaryArgs};
use crate::commands::common::print_json;
use crate::context::ProjectContext;

#[derive(Serialize)]
struct SummaryReport<'a> {
    project: Option<&'a str>,
    graph: String,
    #[serde(flatten)]
    summary: GraphSummary,
}

/// Execute the summary command
pub(crate) fn execute(args: &SummaryArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let report = SummaryReport {
        project: ctx.project_name.as_deref(),
        graph: ctx.graph_path.display().to_string(),
        summary: GraphSummary::from_store(&ctx.store),
    };

    match args.output {
        LsOutput::Json => print_json(&report)?,
        LsOutput::Table => print_report(&report),
    }

    Ok(())
}

fn print_report(report: &SummaryReport) {
    let s = &report.summary;
    if let Some(project) = report.project {
        println!("Project:               {}", project);
    }
    println!("Graph:                 {}", report.graph);
    println!(
        "Nodes:                 {} ({} models, {} sources)",
        s.models + s.sources,
        s.models,
        s.sources
    );
    let packages: Vec<&str> = s.packages.iter().map(String::as_str).collect();
    println!("Packages:              {}", packages.join(", "));
    println!("Columns:               {}", s.columns);
    println!("Dependency edges:      {}", s.dependency_edges);
    println!("Column lineage edges:  {}", s.lineage_edges);
    println!("Structural edges:      {}", s.structural_edges);
    println!("Unknown lineage:       {} model(s)", s.unknown_lineage);
    println!("Dropped references:    {}", s.malformed_references);
}
