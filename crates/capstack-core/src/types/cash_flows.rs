//! Projected cash flow series.

use serde::{Deserialize, Serialize};

use crate::error::{CapstackError, CapstackResult};

/// Ordered cash flow projections, one amount per period.
///
/// A series always holds at least one finite value; both conditions are
/// checked at construction and the series is immutable afterwards.
///
/// # Example
///
/// ```rust
/// use capstack_core::types::CashFlowSeries;
///
/// let flows = CashFlowSeries::new(vec![100_000.0, 120_000.0, 90_000.0]).unwrap();
/// assert_eq!(flows.len(), 3);
/// assert_eq!(flows.min(), 90_000.0);
/// assert_eq!(flows.min_period(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct CashFlowSeries {
    flows: Vec<f64>,
}

impl CashFlowSeries {
    /// Creates a series from per-period amounts.
    ///
    /// # Errors
    ///
    /// [`CapstackError::EmptyCashFlowSeries`] for an empty input,
    /// [`CapstackError::InvalidCashFlow`] for the first NaN or infinite value.
    pub fn new(flows: impl Into<Vec<f64>>) -> CapstackResult<Self> {
        let flows = flows.into();
        if flows.is_empty() {
            return Err(CapstackError::EmptyCashFlowSeries);
        }
        if let Some((period, &value)) = flows.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(CapstackError::InvalidCashFlow { period, value });
        }
        Ok(Self { flows })
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Always false for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Per-period amounts.
    pub fn as_slice(&self) -> &[f64] {
        &self.flows
    }

    /// Iterates over per-period amounts.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.flows.iter().copied()
    }

    /// Smallest cash flow.
    pub fn min(&self) -> f64 {
        self.iter().fold(f64::INFINITY, f64::min)
    }

    /// Index of the smallest cash flow (first one on ties).
    pub fn min_period(&self) -> usize {
        let min = self.min();
        self.flows.iter().position(|&v| v == min).unwrap_or(0)
    }
}

impl TryFrom<Vec<f64>> for CashFlowSeries {
    type Error = CapstackError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CashFlowSeries> for Vec<f64> {
    fn from(value: CashFlowSeries) -> Self {
        value.flows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rejected() {
        assert_eq!(
            CashFlowSeries::new(Vec::new()).unwrap_err(),
            CapstackError::EmptyCashFlowSeries
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = CashFlowSeries::new(vec![1.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, CapstackError::InvalidCashFlow { period: 1, .. }));

        let err = CashFlowSeries::new(vec![f64::INFINITY]).unwrap_err();
        assert!(matches!(err, CapstackError::InvalidCashFlow { period: 0, .. }));
    }

    #[test]
    fn test_negative_flows_allowed() {
        let flows = CashFlowSeries::new(vec![50.0, -20.0, -20.0]).unwrap();
        assert_eq!(flows.min(), -20.0);
        assert_eq!(flows.min_period(), 1);
    }

    #[test]
    fn test_serde_is_plain_array() {
        let flows = CashFlowSeries::new(vec![1.5, 2.5]).unwrap();
        assert_eq!(serde_json::to_string(&flows).unwrap(), "[1.5,2.5]");
        assert!(serde_json::from_str::<CashFlowSeries>("[]").is_err());
    }
}
