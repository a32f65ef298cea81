//! Finite-difference gradients that respect box constraints.

use crate::error::MathError;
use crate::optimization::Bounds;

/// Numerical gradient of `f` at `x`.
///
/// Uses central differences where both probes stay strictly inside the
/// bounds, a forward difference when `x` sits within `step` of its lower
/// bound, and a backward difference near the upper bound. A component whose
/// interval is narrower than the probe is reported as zero. `fx` must be
/// `f(x)`; it is reused by the one-sided formulas.
///
/// # Errors
///
/// Propagates any error raised by `f`. Returns
/// [`MathError::NonFiniteGradient`] if a component evaluates to NaN.
/// Infinite components are allowed: projection maps them onto the bound.
///
/// # Example
///
/// ```rust
/// use capstack_math::optimization::{numerical_gradient, Bounds};
/// use capstack_math::MathError;
///
/// let mut f = |x: &[f64]| Ok::<_, MathError>(x[0] * x[0]);
/// let g = numerical_gradient(&mut f, &[3.0], 9.0, &[Bounds::unbounded()], 1e-6).unwrap();
/// assert!((g[0] - 6.0).abs() < 1e-6);
/// ```
pub fn numerical_gradient<F, E>(
    f: &mut F,
    x: &[f64],
    fx: f64,
    bounds: &[Bounds],
    step: f64,
) -> Result<Vec<f64>, E>
where
    F: FnMut(&[f64]) -> Result<f64, E>,
    E: From<MathError>,
{
    if x.len() != bounds.len() {
        return Err(MathError::DimensionMismatch {
            expected: bounds.len(),
            actual: x.len(),
        }
        .into());
    }

    let mut gradient = vec![0.0; x.len()];
    let mut probe = x.to_vec();

    for (i, b) in bounds.iter().enumerate() {
        let xi = x[i];
        let room_below = xi - step > b.lower;
        let room_above = xi + step < b.upper;

        gradient[i] = match (room_below, room_above) {
            (true, true) => {
                probe[i] = xi + step;
                let up = f(&probe)?;
                probe[i] = xi - step;
                let down = f(&probe)?;
                (up - down) / (2.0 * step)
            }
            (false, true) => {
                probe[i] = xi + step;
                (f(&probe)? - fx) / step
            }
            (true, false) => {
                probe[i] = xi - step;
                (fx - f(&probe)?) / step
            }
            (false, false) => 0.0,
        };
        probe[i] = xi;

        if gradient[i].is_nan() {
            return Err(MathError::NonFiniteGradient { index: i }.into());
        }
    }

    Ok(gradient)
}
