//! Interest coverage simulation.
//!
//! The coverage ratio of a period is its cash flow divided by the interest
//! payment due on the debt. A tranche's coverage is the worst ratio over the
//! projection horizon:
//!
//! ```text
//! coverage = min_i cash_flow_i / (amount * rate)
//! ```

use capstack_config::ZeroInterestPolicy;

use crate::error::{CapstackError, CapstackResult};
use crate::types::{CashFlowSeries, RateTable};

/// Computes worst-period coverage ratios against fixed cash flows and rates.
///
/// The simulator borrows its inputs and holds no state of its own, so it is
/// cheap to build per call and safe to share across threads.
///
/// # Example
///
/// ```rust
/// use capstack_core::coverage::CoverageSimulator;
/// use capstack_core::types::{CashFlowSeries, RateTable};
///
/// let flows = CashFlowSeries::new(vec![100_000.0, 120_000.0]).unwrap();
/// let rates = RateTable::from_pairs([("senior", 0.05)]).unwrap();
/// let simulator = CoverageSimulator::new(&flows, &rates);
///
/// // 100,000 / (1,000,000 * 0.05)
/// assert_eq!(simulator.simulate(1_000_000.0, "senior").unwrap(), 2.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CoverageSimulator<'a> {
    cash_flows: &'a CashFlowSeries,
    rates: &'a RateTable,
    policy: ZeroInterestPolicy,
}

impl<'a> CoverageSimulator<'a> {
    /// Creates a simulator with the default zero-interest policy.
    pub fn new(cash_flows: &'a CashFlowSeries, rates: &'a RateTable) -> Self {
        Self {
            cash_flows,
            rates,
            policy: ZeroInterestPolicy::default(),
        }
    }

    /// Sets the treatment of zero interest payments.
    #[must_use]
    pub fn with_policy(mut self, policy: ZeroInterestPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Cash flows the simulator evaluates against.
    pub fn cash_flows(&self) -> &'a CashFlowSeries {
        self.cash_flows
    }

    /// Rate table used for lookups.
    pub fn rates(&self) -> &'a RateTable {
        self.rates
    }

    /// Active zero-interest policy.
    pub fn policy(&self) -> ZeroInterestPolicy {
        self.policy
    }

    /// Worst-period coverage ratio for `debt_amount` of `debt_type`.
    ///
    /// The amount is not range-checked; callers are expected to pass a
    /// non-negative value.
    ///
    /// # Errors
    ///
    /// - [`CapstackError::UnknownDebtType`] if the rate table has no entry
    /// - [`CapstackError::DegenerateCoverage`] if the interest payment is
    ///   zero and the policy is [`ZeroInterestPolicy::Reject`]
    pub fn simulate(&self, debt_amount: f64, debt_type: &str) -> CapstackResult<f64> {
        let rate = self.rates.rate(debt_type)?;
        self.coverage_at_rate(debt_type, debt_amount, rate)
    }

    /// Per-period coverage ratios for `debt_amount` of `debt_type`.
    ///
    /// Under [`ZeroInterestPolicy::Unbounded`] a zero interest payment gives
    /// `+inf` in every period.
    pub fn coverage_profile(&self, debt_amount: f64, debt_type: &str) -> CapstackResult<Vec<f64>> {
        let rate = self.rates.rate(debt_type)?;
        match self.interest_payment(debt_type, debt_amount, rate)? {
            Some(payment) => Ok(self.cash_flows.iter().map(|cf| cf / payment).collect()),
            None => Ok(vec![f64::INFINITY; self.cash_flows.len()]),
        }
    }

    /// Period whose ratio attains the worst coverage.
    ///
    /// Ties resolve to the earliest period. Returns `None` when the tranche
    /// carries no interest, whatever the policy.
    pub fn binding_period(&self, debt_amount: f64, debt_type: &str) -> CapstackResult<Option<usize>> {
        let rate = self.rates.rate(debt_type)?;
        let payment = debt_amount * rate;
        if payment == 0.0 {
            return Ok(None);
        }

        let mut binding = 0;
        let mut worst = f64::INFINITY;
        for (period, cf) in self.cash_flows.iter().enumerate() {
            let ratio = cf / payment;
            if ratio < worst {
                worst = ratio;
                binding = period;
            }
        }
        Ok(Some(binding))
    }

    /// Coverage for a tranche whose rate is already resolved.
    pub(crate) fn coverage_at_rate(
        &self,
        debt_type: &str,
        debt_amount: f64,
        rate: f64,
    ) -> CapstackResult<f64> {
        match self.interest_payment(debt_type, debt_amount, rate)? {
            Some(payment) => Ok(self
                .cash_flows
                .iter()
                .map(|cf| cf / payment)
                .fold(f64::INFINITY, f64::min)),
            None => Ok(f64::INFINITY),
        }
    }

    /// `Some(amount * rate)`, or `None` for a zero payment the policy allows.
    fn interest_payment(
        &self,
        debt_type: &str,
        debt_amount: f64,
        rate: f64,
    ) -> CapstackResult<Option<f64>> {
        let payment = debt_amount * rate;
        if payment != 0.0 {
            return Ok(Some(payment));
        }
        match self.policy {
            ZeroInterestPolicy::Unbounded => Ok(None),
            ZeroInterestPolicy::Reject => Err(CapstackError::DegenerateCoverage {
                debt_type: debt_type.to_string(),
                amount: debt_amount,
                rate,
            }),
        }
    }
}
