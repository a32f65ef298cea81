//! Box constraints.

use crate::error::{MathError, MathResult};

/// Closed interval `[lower, upper]` on a single variable.
///
/// Either end may be infinite.
///
/// # Example
///
/// ```rust
/// use capstack_math::optimization::Bounds;
///
/// let b = Bounds::non_negative();
/// assert_eq!(b.clamp(-3.0), 0.0);
/// assert_eq!(b.clamp(7.5), 7.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
}

impl Bounds {
    /// Creates a bound, rejecting NaN ends and `lower > upper`.
    pub fn new(lower: f64, upper: f64) -> MathResult<Self> {
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(MathError::InvalidBounds { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// The whole real line.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }

    /// `[0, +inf)`.
    #[must_use]
    pub const fn non_negative() -> Self {
        Self {
            lower: 0.0,
            upper: f64::INFINITY,
        }
    }

    /// Projects `x` onto the interval.
    pub fn clamp(&self, x: f64) -> f64 {
        x.max(self.lower).min(self.upper)
    }

    /// Returns true if `x` lies inside the interval.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.lower && x <= self.upper
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Projects every coordinate of `x` onto its bound.
pub(crate) fn project(x: &mut [f64], bounds: &[Bounds]) {
    for (xi, b) in x.iter_mut().zip(bounds) {
        *xi = b.clamp(*xi);
    }
}
