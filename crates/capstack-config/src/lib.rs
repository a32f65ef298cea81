//! Capstack Configuration Layer
//!
//! This crate provides configuration for the Capstack debt structuring
//! library: the allocation search's solver settings, its starting point, and
//! the policy for tranches that carry no interest.
//!
//! # Features
//!
//! - **Optimizer Configuration**: Initial guess, tolerance, iteration budget,
//!   line search parameters
//! - **Zero-Interest Policy**: Infinite coverage or fail-fast for tranches with
//!   zero interest payment
//! - **Validation**: Every configuration reports all of its problems at once
//! - **Loading**: JSON and TOML documents, partial documents filled from
//!   defaults
//!
//! # Example
//!
//! ```rust
//! use capstack_config::{OptimizerConfig, Validate, ZeroInterestPolicy};
//!
//! let config = OptimizerConfig::standard()
//!     .with_initial_guess(250_000.0)
//!     .with_zero_interest(ZeroInterestPolicy::Reject);
//! assert!(config.is_valid());
//!
//! let parsed: OptimizerConfig =
//!     capstack_config::from_toml_str("max_iterations = 500").unwrap();
//! assert_eq!(parsed.max_iterations, 500);
//! ```
//!
//! # Presets
//!
//! - `standard` - 1,000,000 seed, tolerance 1e-8, 200 iterations
//! - `high_precision` - tolerance 1e-12, 2,000 iterations
//! - `fast` - tolerance 1e-6, 50 iterations

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod loader;
mod optimizer;

pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use loader::{from_json_str, from_path, from_toml_str};
pub use optimizer::{OptimizerConfig, ZeroInterestPolicy};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ConfigError, ConfigResult, Validate};
    pub use crate::optimizer::{OptimizerConfig, ZeroInterestPolicy};
}
