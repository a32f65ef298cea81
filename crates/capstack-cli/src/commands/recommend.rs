//! Recommend command implementation.
//!
//! Optimizes the allocation across every tranche in the rate table.

use anyhow::Result;
use clap::Args;

use crate::cli::OutputFormat;
use crate::commands::InputArgs;
use crate::output::print_report;

/// Arguments for the recommend command.
#[derive(Args, Debug)]
pub struct RecommendArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Execute the recommend command.
pub fn execute(args: RecommendArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let model = args.input.load()?;
    let report = model.recommend_report()?;
    print_report("Recommended Allocation", &report, format, quiet)
}
