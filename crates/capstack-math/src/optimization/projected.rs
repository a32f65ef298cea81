//! Projected gradient descent.

use std::cell::Cell;

use log::{debug, trace};

use crate::error::MathError;
use crate::optimization::bounds::project;
use crate::optimization::{numerical_gradient, Bounds, OptimizationConfig, OptimizationResult};

/// Minimizes `f` over the box described by `bounds`.
///
/// Each iteration takes a finite-difference gradient, steps along its
/// negative, and projects the trial point back onto the box. The first trial
/// step is 1; later iterations start from the previous accepted step divided
/// by `backtracking_factor` (capped at `max_step`). The step is contracted by
/// `backtracking_factor` until the Armijo condition
///
/// ```text
/// f(x_new) <= f(x) - sufficient_decrease * g . (x - x_new)
/// ```
///
/// holds.
///
/// The run converges when the infinity norm of the unit projected step
/// `x - P(x - g)` drops below `tolerance`, or when `f` reaches negative
/// infinity at a feasible point. It stops unconverged when the iteration
/// budget is spent or the line search step collapses below `min_step`; in
/// both cases the last accepted point is returned with `converged = false`.
///
/// # Errors
///
/// - Any error returned by `f` aborts the search and is propagated.
/// - [`MathError::DimensionMismatch`] if `initial` and `bounds` differ in
///   length, [`MathError::InsufficientData`] if they are empty.
/// - [`MathError::NonFiniteObjective`] if `f` is NaN or `+inf` at the
///   (projected) starting point.
///
/// # Example
///
/// ```rust
/// use capstack_math::optimization::{projected_gradient, Bounds, OptimizationConfig};
/// use capstack_math::MathError;
///
/// // Unconstrained minimum at -1 lies outside [0, inf); the answer is 0.
/// let f = |x: &[f64]| Ok::<_, MathError>((x[0] + 1.0).powi(2));
/// let result = projected_gradient(f, &[2.0], &[Bounds::non_negative()], &OptimizationConfig::default()).unwrap();
/// assert!(result.converged);
/// assert_eq!(result.parameters[0], 0.0);
/// ```
pub fn projected_gradient<F, E>(
    mut f: F,
    initial: &[f64],
    bounds: &[Bounds],
    config: &OptimizationConfig,
) -> Result<OptimizationResult, E>
where
    F: FnMut(&[f64]) -> Result<f64, E>,
    E: From<MathError>,
{
    if initial.len() != bounds.len() {
        return Err(MathError::DimensionMismatch {
            expected: bounds.len(),
            actual: initial.len(),
        }
        .into());
    }
    if initial.is_empty() {
        return Err(MathError::insufficient_data(1, 0).into());
    }

    let evaluations = Cell::new(0u32);
    let mut objective = |x: &[f64]| {
        evaluations.set(evaluations.get() + 1);
        f(x)
    };

    let mut x = initial.to_vec();
    project(&mut x, bounds);
    let mut fx = objective(&x)?;
    if fx.is_nan() || fx == f64::INFINITY {
        return Err(MathError::NonFiniteObjective { value: fx }.into());
    }

    let mut residual = f64::INFINITY;
    let mut trial_step = 1.0;

    for iteration in 0..config.max_iterations {
        if fx == f64::NEG_INFINITY {
            debug!("objective unbounded below at feasible point, stopping after {iteration} iterations");
            return Ok(OptimizationResult {
                parameters: x,
                objective_value: fx,
                iterations: iteration,
                evaluations: evaluations.get(),
                residual: 0.0,
                converged: true,
            });
        }

        let gradient = numerical_gradient(&mut objective, &x, fx, bounds, config.step_size)?;
        residual = projected_step_norm(&x, &gradient, bounds);
        trace!("iteration {iteration}: f = {fx:.6e}, projected step = {residual:.3e}");

        if residual < config.tolerance {
            debug!("converged after {iteration} iterations (f = {fx:.6e})");
            return Ok(OptimizationResult {
                parameters: x,
                objective_value: fx,
                iterations: iteration,
                evaluations: evaluations.get(),
                residual,
                converged: true,
            });
        }

        let mut step = trial_step;
        loop {
            let candidate: Vec<f64> = x
                .iter()
                .zip(&gradient)
                .zip(bounds)
                .map(|((xi, gi), b)| b.clamp(xi - step * gi))
                .collect();
            let decrease = directional_decrease(&x, &candidate, &gradient);
            let f_candidate = objective(&candidate)?;

            if f_candidate <= fx - config.sufficient_decrease * decrease {
                x = candidate;
                fx = f_candidate;
                trial_step = (step / config.backtracking_factor).min(config.max_step);
                break;
            }

            step *= config.backtracking_factor;
            if step < config.min_step {
                debug!("line search stalled at iteration {iteration} (f = {fx:.6e})");
                return Ok(OptimizationResult {
                    parameters: x,
                    objective_value: fx,
                    iterations: iteration + 1,
                    evaluations: evaluations.get(),
                    residual,
                    converged: false,
                });
            }
        }
    }

    debug!(
        "iteration budget of {} exhausted (f = {fx:.6e})",
        config.max_iterations
    );
    Ok(OptimizationResult {
        parameters: x,
        objective_value: fx,
        iterations: config.max_iterations,
        evaluations: evaluations.get(),
        residual,
        converged: fx == f64::NEG_INFINITY,
    })
}

/// Infinity norm of `x - P(x - g)`.
fn projected_step_norm(x: &[f64], gradient: &[f64], bounds: &[Bounds]) -> f64 {
    x.iter()
        .zip(gradient)
        .zip(bounds)
        .map(|((xi, gi), b)| (xi - b.clamp(xi - gi)).abs())
        .fold(0.0, f64::max)
}

/// `g . (x - x_new)`, skipping coordinates that did not move.
///
/// A blocked coordinate may carry an infinite gradient; multiplying it by a
/// zero displacement would poison the sum with NaN.
fn directional_decrease(x: &[f64], candidate: &[f64], gradient: &[f64]) -> f64 {
    x.iter()
        .zip(candidate)
        .zip(gradient)
        .filter(|((xi, ci), _)| xi != ci)
        .map(|((xi, ci), gi)| gi * (xi - ci))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unconstrained_quadratic() {
        // Minimize (x-2)^2 + (y-3)^2
        let f = |p: &[f64]| Ok::<_, MathError>((p[0] - 2.0).powi(2) + (p[1] - 3.0).powi(2));

        let result = projected_gradient(
            f,
            &[0.0, 0.0],
            &[Bounds::unbounded(); 2],
            &OptimizationConfig::default(),
        )
        .unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.parameters[0], 2.0, epsilon = 1e-5);
        assert_relative_eq!(result.parameters[1], 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_active_lower_bound() {
        // Unconstrained minimum (-1, 2); x is held at 0.
        let f = |p: &[f64]| Ok::<_, MathError>((p[0] + 1.0).powi(2) + (p[1] - 2.0).powi(2));

        let result = projected_gradient(
            f,
            &[1.0, 1.0],
            &[Bounds::non_negative(), Bounds::unbounded()],
            &OptimizationConfig::default(),
        )
        .unwrap();

        assert!(result.converged);
        assert_eq!(result.parameters[0], 0.0);
        assert_relative_eq!(result.parameters[1], 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_infeasible_start_is_projected() {
        let mut seen_negative = false;
        let f = |p: &[f64]| {
            seen_negative |= p[0] < 0.0;
            Ok::<_, MathError>((p[0] - 1.0).powi(2))
        };

        let result = projected_gradient(
            f,
            &[-5.0],
            &[Bounds::non_negative()],
            &OptimizationConfig::default(),
        )
        .unwrap();

        assert!(!seen_negative);
        assert_relative_eq!(result.parameters[0], 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_unbounded_below_stops_converged() {
        // -1/x is unbounded below as x -> 0+; treat x = 0 as -inf.
        let f = |p: &[f64]| {
            Ok::<_, MathError>(if p[0] == 0.0 {
                f64::NEG_INFINITY
            } else {
                -1.0 / p[0]
            })
        };

        let result = projected_gradient(
            f,
            &[1.0],
            &[Bounds::non_negative()],
            &OptimizationConfig::default(),
        )
        .unwrap();

        assert!(result.converged);
        assert_eq!(result.parameters[0], 0.0);
        assert_eq!(result.objective_value, f64::NEG_INFINITY);
    }

    #[test]
    fn test_budget_exhaustion_is_not_converged() {
        // Decreasing towards +inf without a minimizer.
        let f = |p: &[f64]| Ok::<_, MathError>(1.0 / p[0]);

        let config = OptimizationConfig::default().with_max_iterations(20);
        let result = projected_gradient(f, &[1.0], &[Bounds::non_negative()], &config).unwrap();

        assert!(!result.converged);
        assert_eq!(result.iterations, 20);
        assert!(result.parameters[0] > 1.0);
    }

    #[test]
    fn test_objective_error_aborts() {
        let f = |p: &[f64]| {
            if p[0] < 0.5 {
                Err(MathError::invalid_input("left the safe region"))
            } else {
                Ok(p[0] * p[0])
            }
        };

        let err = projected_gradient(
            f,
            &[1.0],
            &[Bounds::unbounded()],
            &OptimizationConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, MathError::InvalidInput { .. }));
    }

    #[test]
    fn test_step_expansion_reaches_distant_bound() {
        // Gradient 1e-3 at the start; fixed unit steps would need hundreds of
        // iterations to reach the bound.
        let f = |p: &[f64]| {
            Ok::<_, MathError>(if p[0] == 0.0 {
                f64::NEG_INFINITY
            } else {
                -1e-3 / p[0]
            })
        };

        let result = projected_gradient(
            f,
            &[1.0],
            &[Bounds::non_negative()],
            &OptimizationConfig::default(),
        )
        .unwrap();

        assert!(result.converged);
        assert!(result.iterations < 40);
        assert_eq!(result.parameters[0], 0.0);
    }

    #[test]
    fn test_nan_start_rejected() {
        let f = |_: &[f64]| Ok::<_, MathError>(f64::NAN);
        let err = projected_gradient(
            f,
            &[1.0],
            &[Bounds::unbounded()],
            &OptimizationConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MathError::NonFiniteObjective { .. }));
    }

    #[test]
    fn test_dimension_checks() {
        let f = |_: &[f64]| Ok::<_, MathError>(0.0);
        let err = projected_gradient(f, &[1.0, 2.0], &[Bounds::unbounded()], &OptimizationConfig::default())
            .unwrap_err();
        assert!(matches!(err, MathError::DimensionMismatch { .. }));

        let err = projected_gradient(f, &[], &[], &OptimizationConfig::default()).unwrap_err();
        assert!(matches!(err, MathError::InsufficientData { .. }));
    }

    #[test]
    fn test_counts_evaluations() {
        let f = |p: &[f64]| Ok::<_, MathError>((p[0] - 2.0).powi(2));
        let result = projected_gradient(
            f,
            &[0.0],
            &[Bounds::unbounded()],
            &OptimizationConfig::default(),
        )
        .unwrap();
        // One start value, two probes per gradient, at least one trial per step.
        assert!(result.evaluations >= 1 + 3 * result.iterations);
    }
}
