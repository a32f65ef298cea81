//! Output formatting utilities.

use colored::Colorize;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use capstack_core::types::{AllocationReport, TrancheOutcome};

use crate::cli::OutputFormat;

/// Formats and prints rows based on the specified format.
///
/// `Minimal` prints the first row only.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Json => print_json(data),
        OutputFormat::Csv => print_csv(data),
        OutputFormat::Minimal => print_minimal(data),
    }
}

/// Prints data as a formatted table.
fn print_table<T: Tabled>(data: &[T]) -> anyhow::Result<()> {
    if data.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{}", table);
    Ok(())
}

/// Prints data as JSON.
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as CSV.
fn print_csv<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for item in data {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Prints minimal output (first value only).
fn print_minimal<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    if let Some(first) = data.first() {
        println!("{}", serde_json::to_string(first)?);
    }
    Ok(())
}

/// Formats a currency amount.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// Formats a rate as a percentage.
pub fn format_rate(value: f64) -> String {
    format!("{:.4}%", value * 100.0)
}

/// Formats a coverage multiple; infinite coverage prints as "unbounded".
pub fn format_coverage(value: f64) -> String {
    if value == f64::INFINITY {
        "unbounded".to_string()
    } else {
        format!("{:.4}x", value)
    }
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One tranche of an allocation, formatted for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct TrancheRow {
    #[tabled(rename = "Tranche")]
    pub debt_type: String,
    #[tabled(rename = "Rate")]
    pub rate: String,
    #[tabled(rename = "Amount")]
    pub amount: String,
    #[tabled(rename = "Interest")]
    pub interest_payment: String,
    #[tabled(rename = "Worst Coverage")]
    pub worst_coverage: String,
    #[tabled(rename = "Binding Period")]
    pub binding_period: String,
}

impl From<&TrancheOutcome> for TrancheRow {
    fn from(outcome: &TrancheOutcome) -> Self {
        Self {
            debt_type: outcome.debt_type.to_string(),
            rate: format_rate(outcome.rate),
            amount: format_amount(outcome.amount),
            interest_payment: format_amount(outcome.interest_payment),
            worst_coverage: format_coverage(outcome.worst_coverage),
            binding_period: outcome
                .binding_period
                .map_or_else(|| "-".to_string(), |p| p.to_string()),
        }
    }
}

/// Prints an allocation report in the requested format.
pub fn print_report(
    title: &str,
    report: &AllocationReport,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let rows: Vec<TrancheRow> = report.tranches.iter().map(TrancheRow::from).collect();

    match format {
        OutputFormat::Table => {
            if !quiet {
                print_header(title);
            }
            print_output(&rows, format)?;
            if !quiet {
                let summary = vec![
                    KeyValue::new("Worst Coverage", format_coverage(report.worst_coverage)),
                    KeyValue::new("Total Debt", format_amount(report.allocation.total())),
                    KeyValue::new("Iterations", report.iterations.to_string()),
                    KeyValue::new("Evaluations", report.evaluations.to_string()),
                ];
                print_output(&summary, format)?;
            }
        }
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Csv => print_output(&rows, format)?,
        OutputFormat::Minimal => println!("{}", serde_json::to_string(&report.allocation)?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coverage() {
        assert_eq!(format_coverage(2.0), "2.0000x");
        assert_eq!(format_coverage(f64::INFINITY), "unbounded");
        assert_eq!(format_coverage(-0.5), "-0.5000x");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.05), "5.0000%");
    }
}
