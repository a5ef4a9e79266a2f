//! tern CLI - node selection and column-level lineage for dbt-style projects

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::common::ExitCode;
use commands::{columns, lineage, ls, search, show, summary, validate};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    if let Err(err) = run(&cli) {
        match err.downcast_ref::<ExitCode>() {
            Some(ExitCode(code)) => std::process::exit(*code),
            None => {
                eprintln!("Error: {:#}", err);
                std::process::exit(1);
            }
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        cli::Commands::Ls(args) => ls::execute(args, &cli.global),
        cli::Commands::Lineage(args) => lineage::execute(args, &cli.global),
        cli::Commands::Show(args) => show::execute(args, &cli.global),
        cli::Commands::Search(args) => search::execute(args, &cli.global),
        cli::Commands::Columns(args) => columns::execute(args, &cli.global),
        cli::Commands::Summary(args) => summary::execute(args, &cli.global),
        cli::Commands::Validate(args) => validate::execute(args, &cli.global),
    }
}

/// Log to stderr at `warn`, or `debug` with `--verbose`; `RUST_LOG` wins
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
