//! CLI error types.

use std::path::PathBuf;

use capstack_config::ConfigError;
use capstack_core::CapstackError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Neither an input file nor inline cash flows were given.
    #[error("No cash flows given. Use --input <FILE> or --cash-flows <LIST>.")]
    MissingInput,

    /// Both an input file and inline cash flows were given.
    #[error("--input and --cash-flows are mutually exclusive")]
    ConflictingInput,

    /// Input file extension not recognized.
    #[error("Unsupported input file '{}'. Use .json, .yaml, .yml or .csv.", .0.display())]
    UnsupportedInput(PathBuf),

    /// A `--rate` argument is not of the form `id=value`.
    #[error("Invalid rate '{0}'. Use id=value, e.g. senior=0.05.")]
    InvalidRate(String),

    /// A CSV file has no usable cash flow column.
    #[error("Invalid CSV input: {0}")]
    Csv(String),

    /// Model input document could not be parsed.
    #[error("Invalid input document {}: {message}", path.display())]
    Document {
        /// File being parsed.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// Model construction or evaluation failed.
    #[error(transparent)]
    Model(#[from] CapstackError),

    /// Optimizer configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
