//! Batch command implementation.
//!
//! Loads several model documents and recommends an allocation for each in
//! parallel.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use capstack_core::batch::{recommend_batch_reports, BatchSummary};
use capstack_core::model::DebtModel;
use capstack_core::types::AllocationReport;

use crate::cli::OutputFormat;
use crate::commands::{read_document, InputKind, OptimizerArgs};
use crate::error::CliResult;
use crate::output::{
    format_amount, format_coverage, print_header, print_json, print_output, print_warning,
};

/// Arguments for the batch command.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Model documents (JSON or YAML)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub optimizer: OptimizerArgs,
}

/// Outcome for one file.
#[derive(Debug, Serialize, Tabled)]
pub struct BatchRow {
    #[tabled(rename = "File")]
    pub file: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Total Debt")]
    pub total_debt: String,
    #[tabled(rename = "Worst Coverage")]
    pub worst_coverage: String,
    #[tabled(rename = "Error")]
    pub error: String,
}

/// JSON form of one file's outcome.
#[derive(Debug, Serialize)]
struct BatchEntry<'a> {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a AllocationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn load(args: &BatchArgs, path: &Path) -> CliResult<DebtModel> {
    let input = read_document(path, InputKind::of(path)?)?;
    let config = args.optimizer.resolve(input.optimizer.clone())?;
    let model = DebtModel::new(input.cash_flows, input.interest_rates);
    Ok(match config {
        Some(config) => model.with_config(config)?,
        None => model,
    })
}

/// Execute the batch command.
pub fn execute(args: BatchArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let mut models = Vec::with_capacity(args.files.len());
    for path in &args.files {
        models.push(load(&args, path)?);
    }

    let results = recommend_batch_reports(&models);
    let summary = BatchSummary::from_results(&results);
    let files = args.files.iter().map(|p| p.display().to_string());

    match format {
        OutputFormat::Json => {
            let entries: Vec<BatchEntry<'_>> = files
                .zip(&results)
                .map(|(file, result)| BatchEntry {
                    file,
                    report: result.as_ref().ok(),
                    error: result.as_ref().err().map(ToString::to_string),
                })
                .collect();
            print_json(&entries)?;
        }
        _ => {
            let rows: Vec<BatchRow> = files
                .zip(&results)
                .map(|(file, result)| match result {
                    Ok(report) => BatchRow {
                        file,
                        status: "ok".to_string(),
                        total_debt: format_amount(report.allocation.total()),
                        worst_coverage: format_coverage(report.worst_coverage),
                        error: String::new(),
                    },
                    Err(e) => BatchRow {
                        file,
                        status: "failed".to_string(),
                        total_debt: String::new(),
                        worst_coverage: String::new(),
                        error: e.to_string(),
                    },
                })
                .collect();
            if format == OutputFormat::Table && !quiet {
                print_header("Batch Recommendation");
            }
            print_output(&rows, format)?;
        }
    }

    if summary.failed > 0 && !quiet {
        print_warning(&format!(
            "{} of {} models failed",
            summary.failed,
            summary.succeeded + summary.failed
        ));
    }

    Ok(())
}
