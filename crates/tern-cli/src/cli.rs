//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// tern - node selection and column-level lineage for dbt-style projects
#[derive(Parser, Debug)]
#[command(name = "tern")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override graph document path
    #[arg(short, long, global = true, env = "TERN_GRAPH")]
    pub graph: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List selected nodes
    Ls(LsArgs),

    /// Trace the lineage of a column
    Lineage(LineageArgs),

    /// Show a node's attributes, columns and direct lineage
    Show(ShowArgs),

    /// Search nodes by name or description
    Search(SearchArgs),

    /// Find nodes exposing a column
    Columns(ColumnsArgs),

    /// Summarize the graph
    Summary(SummaryArgs),

    /// Report references to unknown nodes
    Validate(ValidateArgs),
}

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: LsOutput,

    /// dbt-style selector; repeat to union several
    #[arg(short, long)]
    pub select: Vec<String>,
}

/// List output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LsOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

/// Arguments for the lineage command
#[derive(Args, Debug)]
pub struct LineageArgs {
    /// Node id or unique node name
    #[arg(short, long)]
    pub node: String,

    /// Column to trace
    #[arg(long)]
    pub column: String,

    /// Which way to trace
    #[arg(short, long, value_enum, default_value = "upstream")]
    pub direction: LineageDirection,

    /// Restrict lineage to nodes matching these selectors
    #[arg(short, long)]
    pub select: Vec<String>,

    /// Maximum number of hops
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Follow filter and join edges as well as data edges
    #[arg(long)]
    pub include_structural: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: LineageOutput,
}

/// Lineage trace direction
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineageDirection {
    /// Columns this column is derived from
    Upstream,
    /// Columns derived from this column
    Downstream,
    /// Both directions
    Both,
}

/// Lineage output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineageOutput {
    /// Table of edges
    Table,
    /// JSON output
    Json,
    /// Indented tree
    Tree,
}

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Node id or unique node name
    pub node: String,

    /// Only show this column (case-insensitive)
    #[arg(long)]
    pub column: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: LsOutput,
}

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Case-insensitive text to look for
    pub query: String,

    /// Only return nodes of this kind
    #[arg(short, long, value_enum)]
    pub kind: Option<KindFilter>,
}

/// Node kind filter
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFilter {
    Model,
    Source,
}

/// Arguments for the columns command
#[derive(Args, Debug)]
pub struct ColumnsArgs {
    /// Column name (case-insensitive)
    pub column: String,
}

/// Arguments for the summary command
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: LsOutput,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Report dropped references without failing
    #[arg(long)]
    pub allow_dropped: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
