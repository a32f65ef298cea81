//! CLI command implementations.

pub mod batch;
pub mod optimize;
pub mod recommend;
pub mod simulate;

pub use batch::BatchArgs;
pub use optimize::OptimizeArgs;
pub use recommend::RecommendArgs;
pub use simulate::SimulateArgs;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use tracing::debug;

use capstack_config::{OptimizerConfig, ZeroInterestPolicy};
use capstack_core::model::{DebtModel, ModelInput};
use capstack_core::types::{CashFlowSeries, RateTable};

use crate::error::{CliError, CliResult};

/// Model inputs shared by every single-model command.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Model file: JSON or YAML document, or a CSV of cash flows
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Inline cash flows, comma separated
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub cash_flows: Vec<f64>,

    /// Tranche rate as id=value (repeatable); appended to any rates in the input file
    #[arg(short, long = "rate")]
    pub rates: Vec<String>,

    #[command(flatten)]
    pub optimizer: OptimizerArgs,
}

/// Optimizer settings from the command line.
#[derive(Args, Debug)]
pub struct OptimizerArgs {
    /// Optimizer configuration file (JSON or TOML); replaces settings in the input file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Treatment of tranches with zero interest payment
    #[arg(long, value_enum)]
    pub zero_interest: Option<PolicyArg>,
}

/// Zero-interest policy choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Zero payment gives unbounded coverage
    Unbounded,
    /// Zero payment is an error
    Reject,
}

impl From<PolicyArg> for ZeroInterestPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Unbounded => ZeroInterestPolicy::Unbounded,
            PolicyArg::Reject => ZeroInterestPolicy::Reject,
        }
    }
}

impl OptimizerArgs {
    /// Applies the command-line settings on top of `base`.
    pub fn resolve(&self, base: Option<OptimizerConfig>) -> CliResult<Option<OptimizerConfig>> {
        let mut config = match &self.config {
            Some(path) => Some(capstack_config::from_path(path)?),
            None => base,
        };
        if let Some(policy) = self.zero_interest {
            config = Some(
                config
                    .unwrap_or_default()
                    .with_zero_interest(policy.into()),
            );
        }
        Ok(config)
    }
}

impl InputArgs {
    /// Builds the model described by the arguments.
    pub fn load(&self) -> CliResult<DebtModel> {
        let (cash_flows, mut rates, config) = match (&self.input, self.cash_flows.is_empty()) {
            (Some(_), false) => return Err(CliError::ConflictingInput),
            (None, true) => return Err(CliError::MissingInput),
            (None, false) => (CashFlowSeries::new(self.cash_flows.clone())?, RateTable::new(), None),
            (Some(path), true) => match InputKind::of(path)? {
                InputKind::Csv => (read_csv_cash_flows(path)?, RateTable::new(), None),
                kind => {
                    let input = read_document(path, kind)?;
                    (input.cash_flows, input.interest_rates, input.optimizer)
                }
            },
        };

        for rate in &self.rates {
            let (debt_type, value) = parse_rate(rate)?;
            rates.insert(debt_type, value)?;
        }

        let model = DebtModel::new(cash_flows, rates);
        let model = match self.optimizer.resolve(config)? {
            Some(config) => model.with_config(config)?,
            None => model,
        };
        debug!(
            periods = model.cash_flows().len(),
            tranches = model.rates().len(),
            "model loaded"
        );
        Ok(model)
    }
}

/// Input file kinds, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// JSON model document.
    Json,
    /// YAML model document.
    Yaml,
    /// CSV of cash flows.
    Csv,
}

impl InputKind {
    /// Determines the kind from the file extension.
    pub fn of(path: &Path) -> CliResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("csv") => Ok(Self::Csv),
            _ => Err(CliError::UnsupportedInput(path.to_path_buf())),
        }
    }
}

/// Reads a JSON or YAML model document.
pub fn read_document(path: &Path, kind: InputKind) -> CliResult<ModelInput> {
    let content = fs::read_to_string(path)?;
    let document = |message: String| CliError::Document {
        path: path.to_path_buf(),
        message,
    };
    match kind {
        InputKind::Json => serde_json::from_str(&content).map_err(|e| document(e.to_string())),
        InputKind::Yaml => serde_yaml::from_str(&content).map_err(|e| document(e.to_string())),
        InputKind::Csv => Err(document("CSV files carry no interest rates".to_string())),
    }
}

/// Reads cash flows from a CSV file with a header row.
///
/// The `cash_flow` column is used when present, otherwise the last column.
pub fn read_csv_cash_flows(path: &Path) -> CliResult<CashFlowSeries> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| CliError::Csv(e.to_string()))?;
    let headers = reader
        .headers()
        .map_err(|e| CliError::Csv(e.to_string()))?
        .clone();
    let column = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("cash_flow"))
        .or_else(|| headers.len().checked_sub(1))
        .ok_or_else(|| CliError::Csv("missing header row".to_string()))?;

    let mut flows = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| CliError::Csv(e.to_string()))?;
        let field = record.get(column).unwrap_or_default().trim();
        let value = field.parse::<f64>().map_err(|_| {
            CliError::Csv(format!("row {}: '{}' is not a number", row + 1, field))
        })?;
        flows.push(value);
    }

    Ok(CashFlowSeries::new(flows)?)
}

/// Parses an `id=value` rate argument.
pub fn parse_rate(arg: &str) -> CliResult<(String, f64)> {
    let (debt_type, value) = arg
        .split_once('=')
        .ok_or_else(|| CliError::InvalidRate(arg.to_string()))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| CliError::InvalidRate(arg.to_string()))?;
    Ok((debt_type.trim().to_string(), value))
}
