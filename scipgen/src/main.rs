//! Driver: loads the index, runs the selected backend, reports diagnostics.

mod cli;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use scipgen_codegen::diagnostics::print_diagnostics;
use scipgen_codegen::{Codegen, ProtocolTables, Reporter};
use scipgen_scip::{Index, SymbolTable};

use crate::cli::Cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(error_count) => {
            error!(error_count, "generation finished with errors");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Runs one generation and returns the number of error diagnostics.
fn run(cli: &Cli) -> anyhow::Result<usize> {
    let index = Index::read_from(&cli.input)
        .with_context(|| format!("failed to read index from {}", cli.input.display()))?;
    let symtab = SymbolTable::load(&index).context("failed to load symbol table")?;
    let options = cli.codegen_options();
    let tables = ProtocolTables::default();
    let mut reporter = Reporter::new(cli.severity());
    Codegen::new(&options, &tables, &symtab, &mut reporter)
        .run()
        .context("code generation failed")?;
    print_diagnostics(&index, &reporter);
    Ok(reporter.error_count())
}
