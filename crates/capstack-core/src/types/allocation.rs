//! Debt allocations and search reports.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::types::DebtType;

/// Debt amount per tranche, in the order the tranches were optimized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebtAllocation {
    amounts: Vec<(DebtType, f64)>,
}

impl DebtAllocation {
    pub(crate) fn from_entries(amounts: Vec<(DebtType, f64)>) -> Self {
        Self { amounts }
    }

    /// Amount allocated to a tranche.
    pub fn get(&self, debt_type: &str) -> Option<f64> {
        self.amounts
            .iter()
            .find(|(d, _)| d.as_str() == debt_type)
            .map(|&(_, amount)| amount)
    }

    /// `(identifier, amount)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&DebtType, f64)> + '_ {
        self.amounts.iter().map(|(d, a)| (d, *a))
    }

    /// Sum of all tranche amounts.
    pub fn total(&self) -> f64 {
        self.amounts.iter().map(|(_, a)| a).sum()
    }

    /// Number of tranches.
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    /// Returns true if no tranche is present.
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

impl Serialize for DebtAllocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.amounts.len()))?;
        for (debt_type, amount) in &self.amounts {
            map.serialize_entry(debt_type.as_str(), amount)?;
        }
        map.end()
    }
}

/// Outcome for one tranche at the converged allocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrancheOutcome {
    /// Tranche identifier.
    pub debt_type: DebtType,
    /// Allocated amount.
    pub amount: f64,
    /// Periodic rate.
    pub rate: f64,
    /// `amount * rate`.
    pub interest_payment: f64,
    /// Worst-period coverage; `+inf` when the tranche carries no interest.
    pub worst_coverage: f64,
    /// Period attaining the worst coverage, if the tranche carries interest.
    pub binding_period: Option<usize>,
}

/// Allocation plus search diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationReport {
    /// Converged allocation.
    pub allocation: DebtAllocation,
    /// Per-tranche outcomes, in allocation order.
    pub tranches: Vec<TrancheOutcome>,
    /// Minimum of the tranches' worst coverages; the maximized quantity.
    pub worst_coverage: f64,
    /// Solver iterations.
    pub iterations: u32,
    /// Objective evaluations, gradient probes included.
    pub evaluations: u32,
}
