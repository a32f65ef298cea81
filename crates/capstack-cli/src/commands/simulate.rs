//! Simulate command implementation.
//!
//! Computes the worst-period coverage ratio of a debt amount, optionally
//! with the full per-period profile.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::commands::InputArgs;
use crate::output::{
    format_amount, format_coverage, format_rate, print_header, print_json, print_output, KeyValue,
};

/// Arguments for the simulate command.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Debt amount
    #[arg(short, long)]
    pub amount: f64,

    /// Tranche whose rate applies
    #[arg(short, long)]
    pub debt_type: String,

    /// Show the coverage ratio of every period
    #[arg(short, long)]
    pub profile: bool,
}

/// Coverage of one period.
#[derive(Debug, Serialize, Tabled)]
pub struct PeriodRow {
    #[tabled(rename = "Period")]
    pub period: usize,
    #[tabled(rename = "Cash Flow")]
    pub cash_flow: f64,
    #[tabled(rename = "Coverage")]
    pub coverage: f64,
}

/// JSON form of a simulation.
#[derive(Debug, Serialize)]
struct SimulationOutput<'a> {
    debt_type: &'a str,
    amount: f64,
    rate: f64,
    coverage: f64,
    binding_period: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<Vec<f64>>,
}

/// Execute the simulate command.
pub fn execute(args: SimulateArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let model = args.input.load()?;
    let coverage = model.simulate(args.amount, &args.debt_type)?;
    let rate = model.rates().rate(&args.debt_type)?;
    let binding_period = model.simulator().binding_period(args.amount, &args.debt_type)?;
    let profile = if args.profile {
        Some(model.coverage_profile(args.amount, &args.debt_type)?)
    } else {
        None
    };

    match format {
        OutputFormat::Table => {
            if !quiet {
                print_header("Coverage Simulation");
            }
            let results = vec![
                KeyValue::new("Debt Type", args.debt_type.clone()),
                KeyValue::new("Amount", format_amount(args.amount)),
                KeyValue::new("Rate", format_rate(rate)),
                KeyValue::new("Interest Payment", format_amount(args.amount * rate)),
                KeyValue::new("Worst Coverage", format_coverage(coverage)),
                KeyValue::new(
                    "Binding Period",
                    binding_period.map_or_else(|| "-".to_string(), |p| p.to_string()),
                ),
            ];
            print_output(&results, format)?;
            if let Some(profile) = &profile {
                let rows = period_rows(model.cash_flows().as_slice(), profile);
                print_output(&rows, format)?;
            }
        }
        OutputFormat::Json => print_json(&SimulationOutput {
            debt_type: &args.debt_type,
            amount: args.amount,
            rate,
            coverage,
            binding_period,
            profile,
        })?,
        OutputFormat::Csv => match &profile {
            Some(profile) => {
                let rows = period_rows(model.cash_flows().as_slice(), profile);
                print_output(&rows, format)?;
            }
            None => {
                let results = vec![KeyValue::new("Worst Coverage", coverage.to_string())];
                print_output(&results, format)?;
            }
        },
        OutputFormat::Minimal => println!("{}", coverage),
    }

    Ok(())
}

fn period_rows(cash_flows: &[f64], profile: &[f64]) -> Vec<PeriodRow> {
    cash_flows
        .iter()
        .zip(profile)
        .enumerate()
        .map(|(period, (&cash_flow, &coverage))| PeriodRow {
            period,
            cash_flow,
            coverage,
        })
        .collect()
}
