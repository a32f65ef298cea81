//! Optimize command implementation.
//!
//! Optimizes the allocation across a chosen subset of tranches.

use anyhow::Result;
use clap::Args;

use crate::cli::OutputFormat;
use crate::commands::InputArgs;
use crate::output::print_report;

/// Arguments for the optimize command.
#[derive(Args, Debug)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Tranches to allocate, comma separated, in output order
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub types: Vec<String>,
}

/// Execute the optimize command.
pub fn execute(args: OptimizeArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let model = args.input.load()?;
    let types: Vec<&str> = args.types.iter().map(|t| t.trim()).collect();
    let report = model.optimize_report(&types)?;
    print_report("Optimized Allocation", &report, format, quiet)
}
