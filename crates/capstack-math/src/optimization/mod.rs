//! Optimization algorithms.
//!
//! This module provides a box-constrained local minimizer:
//!
//! - [`Bounds`]: closed interval bound on one variable
//! - [`numerical_gradient`]: finite-difference gradient that never probes
//!   outside the bounds
//! - [`projected_gradient`]: projected steepest descent with Armijo
//!   backtracking
//!
//! Objectives are fallible (`FnMut(&[f64]) -> Result<f64, E>`). Any error the
//! objective raises aborts the search and is returned as-is, so `E` only needs
//! `From<MathError>` for the solver's own failures.

mod bounds;
mod gradient;
mod projected;

pub use bounds::Bounds;
pub use gradient::numerical_gradient;
pub use projected::projected_gradient;

/// Default convergence tolerance on the projected-gradient step.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Default iteration budget.
pub const DEFAULT_MAX_ITERATIONS: u32 = 200;

/// Configuration for optimization algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationConfig {
    /// Tolerance for convergence.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
    /// Step size for numerical gradients.
    pub step_size: f64,
    /// Armijo sufficient-decrease parameter, in (0, 1).
    pub sufficient_decrease: f64,
    /// Line search contraction factor, in (0, 1).
    pub backtracking_factor: f64,
    /// Line search gives up once the step falls below this length.
    pub min_step: f64,
    /// Cap on the trial step length. Each accepted step lets the next
    /// iteration start from a longer trial, up to this cap.
    pub max_step: f64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            step_size: 1e-6,
            sufficient_decrease: 1e-4,
            backtracking_factor: 0.5,
            min_step: 1e-15,
            max_step: 1e6,
        }
    }
}

impl OptimizationConfig {
    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the finite-difference step.
    #[must_use]
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }
}

/// Result of an optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    /// Optimal parameters found.
    pub parameters: Vec<f64>,
    /// Final objective function value.
    pub objective_value: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Number of objective evaluations, gradient probes included.
    pub evaluations: u32,
    /// Infinity norm of the last projected-gradient step.
    pub residual: f64,
    /// Whether the optimization converged.
    pub converged: bool,
}
