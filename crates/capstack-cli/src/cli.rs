//! CLI argument definitions.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::commands::{BatchArgs, OptimizeArgs, RecommendArgs, SimulateArgs};

/// Capstack - Debt tranche allocation by worst-period interest coverage
#[derive(Parser)]
#[command(name = "capstack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress headers and summaries
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Recommend an allocation across every tranche in the rate table
    Recommend(RecommendArgs),

    /// Optimize the allocation across selected tranches
    Optimize(OptimizeArgs),

    /// Worst-period coverage ratio of a debt amount
    Simulate(SimulateArgs),

    /// Recommend allocations for several model files in parallel
    Batch(BatchArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the value)
    Minimal,
}
