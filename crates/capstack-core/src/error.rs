//! Error types for the Capstack library.
//!
//! Every failure of the coverage simulator, the allocation search, or input
//! construction is reported through [`CapstackError`].

use capstack_config::ConfigError;
use capstack_math::MathError;
use thiserror::Error;

/// A specialized Result type for Capstack operations.
pub type CapstackResult<T> = Result<T, CapstackError>;

/// The main error type for Capstack operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CapstackError {
    /// A debt type has no entry in the rate table.
    #[error("Unknown debt type: '{debt_type}'")]
    UnknownDebtType {
        /// The identifier that failed lookup.
        debt_type: String,
    },

    /// Interest payment is zero and the policy rejects it.
    #[error(
        "Degenerate coverage for '{debt_type}': interest payment is zero (amount {amount}, rate {rate})"
    )]
    DegenerateCoverage {
        /// Tranche whose coverage is undefined.
        debt_type: String,
        /// Debt amount under evaluation.
        amount: f64,
        /// Tranche rate.
        rate: f64,
    },

    /// The allocation search stopped without meeting its convergence criterion.
    #[error("Optimization failed after {iterations} iterations (residual: {residual:.2e})")]
    OptimizationFailure {
        /// Iterations performed.
        iterations: u32,
        /// Last projected-gradient step norm.
        residual: f64,
    },

    /// No cash flows were supplied.
    #[error("Cash flow series is empty")]
    EmptyCashFlowSeries,

    /// A cash flow is NaN or infinite.
    #[error("Invalid cash flow in period {period}: {value}")]
    InvalidCashFlow {
        /// Zero-based period index.
        period: usize,
        /// The offending value.
        value: f64,
    },

    /// A rate is negative, NaN or infinite.
    #[error("Invalid rate for '{debt_type}': {rate}")]
    InvalidRate {
        /// Tranche identifier.
        debt_type: String,
        /// The offending rate.
        rate: f64,
    },

    /// A debt amount is negative, NaN or infinite.
    #[error("Invalid debt amount {amount}: must be finite and non-negative")]
    InvalidAmount {
        /// The offending amount.
        amount: f64,
    },

    /// A debt-type identifier is empty or blank.
    #[error("Invalid debt type identifier: '{debt_type}'")]
    InvalidDebtType {
        /// The rejected identifier.
        debt_type: String,
    },

    /// The same debt type appears twice.
    #[error("Duplicate debt type: '{debt_type}'")]
    DuplicateDebtType {
        /// The repeated identifier.
        debt_type: String,
    },

    /// The search was asked to allocate across zero tranches.
    #[error("No debt types to optimize")]
    NoDebtTypes,

    /// A model input document could not be parsed.
    #[error("Invalid model input: {0}")]
    Input(String),

    /// Optimizer configuration failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Numerical library failure.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl CapstackError {
    /// Creates an unknown debt type error.
    #[must_use]
    pub fn unknown_debt_type(debt_type: impl Into<String>) -> Self {
        Self::UnknownDebtType {
            debt_type: debt_type.into(),
        }
    }

    /// Creates a duplicate debt type error.
    #[must_use]
    pub fn duplicate_debt_type(debt_type: impl Into<String>) -> Self {
        Self::DuplicateDebtType {
            debt_type: debt_type.into(),
        }
    }
}

impl From<serde_json::Error> for CapstackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Input(err.to_string())
    }
}

impl From<ConfigError> for CapstackError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
