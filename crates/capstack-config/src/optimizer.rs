//! Optimizer configuration types.
//!
//! This module defines the tunable parameters of the allocation search and
//! the policy for tranches that carry no interest.

use serde::{Deserialize, Serialize};
use std::fmt;

use capstack_math::optimization::OptimizationConfig;

use crate::error::{Validate, ValidationError};

// =============================================================================
// ZERO-INTEREST POLICY
// =============================================================================

/// How to treat a tranche whose interest payment is zero.
///
/// A zero payment arises from a zero debt amount or a zero rate and makes
/// every period's coverage ratio a division by zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroInterestPolicy {
    /// Coverage is `+inf`; the tranche never binds.
    #[default]
    Unbounded,
    /// Fail with a degenerate-coverage error.
    ///
    /// With positive cash flows the search drives tranches toward zero debt,
    /// so optimization fails as soon as a tranche reaches the bound.
    Reject,
}

impl fmt::Display for ZeroInterestPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZeroInterestPolicy::Unbounded => write!(f, "unbounded"),
            ZeroInterestPolicy::Reject => write!(f, "reject"),
        }
    }
}

// =============================================================================
// OPTIMIZER CONFIGURATION
// =============================================================================

/// Settings for the allocation search.
///
/// Every field has a default, so partial JSON/TOML documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Starting debt amount for every tranche, in currency units. Must be
    /// positive: a zero seed sits on the zero-interest singularity.
    pub initial_guess: f64,

    /// Convergence tolerance on the projected-gradient step. Amounts are
    /// measured in units of `initial_guess` and the objective is divided by
    /// the worst coverage at that guess, so the value is independent of the
    /// currency unit.
    pub tolerance: f64,

    /// Iteration budget for the search.
    pub max_iterations: u32,

    /// Relative finite-difference step for gradient estimates.
    pub finite_difference_step: f64,

    /// Armijo sufficient-decrease parameter.
    pub sufficient_decrease: f64,

    /// Line search contraction factor.
    pub backtracking_factor: f64,

    /// Treatment of tranches with zero interest payment.
    pub zero_interest: ZeroInterestPolicy,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl OptimizerConfig {
    /// Default settings: 1,000,000 seed, 1e-8 tolerance, 200 iterations.
    pub fn standard() -> Self {
        Self {
            initial_guess: 1_000_000.0,
            tolerance: 1e-8,
            max_iterations: 200,
            finite_difference_step: 1e-6,
            sufficient_decrease: 1e-4,
            backtracking_factor: 0.5,
            zero_interest: ZeroInterestPolicy::Unbounded,
        }
    }

    /// Tighter tolerance and a larger iteration budget.
    pub fn high_precision() -> Self {
        Self {
            tolerance: 1e-12,
            max_iterations: 2_000,
            finite_difference_step: 1e-8,
            ..Self::standard()
        }
    }

    /// Loose tolerance and a short budget, for interactive use.
    pub fn fast() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 50,
            ..Self::standard()
        }
    }

    /// Builder method to set the initial guess.
    #[must_use]
    pub fn with_initial_guess(mut self, initial_guess: f64) -> Self {
        self.initial_guess = initial_guess;
        self
    }

    /// Builder method to set the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Builder method to set the iteration budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Builder method to set the zero-interest policy.
    #[must_use]
    pub fn with_zero_interest(mut self, policy: ZeroInterestPolicy) -> Self {
        self.zero_interest = policy;
        self
    }

    /// Solver settings derived from this configuration.
    pub fn solver_config(&self) -> OptimizationConfig {
        OptimizationConfig {
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            step_size: self.finite_difference_step,
            sufficient_decrease: self.sufficient_decrease,
            backtracking_factor: self.backtracking_factor,
            ..OptimizationConfig::default()
        }
    }
}

impl Validate for OptimizerConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !self.initial_guess.is_finite() || self.initial_guess <= 0.0 {
            errors.push(ValidationError::with_rule(
                "initial_guess",
                format!("Initial guess must be positive and finite, got {}", self.initial_guess),
                "positive_seed",
            ));
        }

        if !(self.tolerance > 0.0 && self.tolerance <= 1e-2) {
            errors.push(ValidationError::with_rule(
                "tolerance",
                "Tolerance must be in (0, 1e-2]",
                "valid_tolerance",
            ));
        }

        if self.max_iterations == 0 || self.max_iterations > 100_000 {
            errors.push(ValidationError::with_rule(
                "max_iterations",
                "Max iterations must be between 1 and 100000",
                "valid_iterations",
            ));
        }

        if !(self.finite_difference_step > 0.0 && self.finite_difference_step <= 0.1) {
            errors.push(ValidationError::with_rule(
                "finite_difference_step",
                "Finite-difference step must be in (0, 0.1]",
                "valid_step",
            ));
        }

        if !(self.sufficient_decrease > 0.0 && self.sufficient_decrease < 1.0) {
            errors.push(ValidationError::with_rule(
                "sufficient_decrease",
                "Sufficient-decrease parameter must be in (0, 1)",
                "open_unit_interval",
            ));
        }

        if !(self.backtracking_factor > 0.0 && self.backtracking_factor < 1.0) {
            errors.push(ValidationError::with_rule(
                "backtracking_factor",
                "Backtracking factor must be in (0, 1)",
                "open_unit_interval",
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(OptimizerConfig::standard().is_valid());
        assert!(OptimizerConfig::high_precision().is_valid());
        assert!(OptimizerConfig::fast().is_valid());
    }

    #[test]
    fn test_default_is_standard() {
        let config = OptimizerConfig::default();
        assert_eq!(config, OptimizerConfig::standard());
        assert_eq!(config.initial_guess, 1_000_000.0);
        assert_eq!(config.zero_interest, ZeroInterestPolicy::Unbounded);
    }

    #[test]
    fn test_zero_seed_rejected() {
        let config = OptimizerConfig::standard().with_initial_guess(0.0);
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "initial_guess");
    }

    #[test]
    fn test_nan_fields_rejected() {
        let config = OptimizerConfig {
            tolerance: f64::NAN,
            finite_difference_step: f64::NAN,
            ..OptimizerConfig::standard()
        };
        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["tolerance", "finite_difference_step"]);
    }

    #[test]
    fn test_solver_config_mapping() {
        let config = OptimizerConfig::standard()
            .with_tolerance(1e-9)
            .with_max_iterations(42);
        let solver = config.solver_config();
        assert_eq!(solver.tolerance, 1e-9);
        assert_eq!(solver.max_iterations, 42);
        assert_eq!(solver.step_size, 1e-6);
        assert_eq!(solver.backtracking_factor, 0.5);
    }

    #[test]
    fn test_policy_serde_names() {
        let json = serde_json::to_string(&ZeroInterestPolicy::Reject).unwrap();
        assert_eq!(json, "\"reject\"");
        let policy: ZeroInterestPolicy = serde_json::from_str("\"unbounded\"").unwrap();
        assert_eq!(policy, ZeroInterestPolicy::Unbounded);
        assert_eq!(ZeroInterestPolicy::Reject.to_string(), "reject");
    }

    proptest::proptest! {
        #[test]
        fn prop_any_positive_seed_is_valid(seed in 1e-6..1e12f64) {
            let config = OptimizerConfig::standard().with_initial_guess(seed);
            proptest::prop_assert!(config.is_valid());
        }

        #[test]
        fn prop_non_positive_seed_is_rejected(seed in -1e12..=0.0f64) {
            let errors = OptimizerConfig::standard().with_initial_guess(seed).validate();
            proptest::prop_assert_eq!(errors.len(), 1);
            proptest::prop_assert_eq!(errors[0].field.as_str(), "initial_guess");
        }
    }
}
