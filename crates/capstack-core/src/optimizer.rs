//! Max-min allocation search.
//!
//! The optimizer looks for the debt amounts that maximize the worst coverage
//! ratio across tranches. It minimizes the negated objective
//!
//! ```text
//! f(x) = -min_i simulate(x_i, debt_type_i)
//! ```
//!
//! over `x >= 0` with the projected gradient method from `capstack-math`.
//! Every coordinate starts at the configured initial guess. The search runs
//! in units of that guess, and the objective is divided by its magnitude at
//! the guess, so the solver's tolerance and finite-difference step are
//! dimensionless in both amount and cash-flow units.
//!
//! A search that settles on a finite objective has stopped on a plateau.
//! Under [`ZeroInterestPolicy::Unbounded`] the all-zero allocation is then
//! compared against the result and kept when it covers better.

use capstack_config::{OptimizerConfig, ZeroInterestPolicy};
use capstack_math::optimization::{projected_gradient, Bounds};
use tracing::{debug, info, warn};

use crate::coverage::CoverageSimulator;
use crate::error::{CapstackError, CapstackResult};
use crate::types::{AllocationReport, DebtAllocation, DebtType, TrancheOutcome};

/// Searches for the allocation with the best worst-period coverage.
///
/// # Example
///
/// ```rust
/// use capstack_config::{OptimizerConfig, ZeroInterestPolicy};
/// use capstack_core::coverage::CoverageSimulator;
/// use capstack_core::optimizer::AllocationOptimizer;
/// use capstack_core::types::{CashFlowSeries, RateTable};
///
/// let flows = CashFlowSeries::new(vec![100_000.0, 120_000.0]).unwrap();
/// let rates = RateTable::from_pairs([("senior", 0.05), ("mezzanine", 0.10)]).unwrap();
/// let config = OptimizerConfig::default();
/// let optimizer = AllocationOptimizer::new(CoverageSimulator::new(&flows, &rates), &config);
///
/// let allocation = optimizer.optimize(&["senior", "mezzanine"]).unwrap();
/// assert!(allocation.iter().all(|(_, amount)| amount >= 0.0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AllocationOptimizer<'a> {
    simulator: CoverageSimulator<'a>,
    config: &'a OptimizerConfig,
}

impl<'a> AllocationOptimizer<'a> {
    /// Creates an optimizer. The config's zero-interest policy replaces the
    /// simulator's.
    pub fn new(simulator: CoverageSimulator<'a>, config: &'a OptimizerConfig) -> Self {
        Self {
            simulator: simulator.with_policy(config.zero_interest),
            config,
        }
    }

    /// Optimizes the amounts of `debt_types`, returning only the allocation.
    ///
    /// # Errors
    ///
    /// See [`optimize_report`](Self::optimize_report).
    pub fn optimize<S: AsRef<str>>(&self, debt_types: &[S]) -> CapstackResult<DebtAllocation> {
        self.optimize_report(debt_types).map(|report| report.allocation)
    }

    /// Optimizes the amounts of `debt_types`.
    ///
    /// The result lists the tranches in the order given.
    ///
    /// # Errors
    ///
    /// - [`CapstackError::NoDebtTypes`] for an empty list
    /// - [`CapstackError::UnknownDebtType`] for a type missing from the rate table
    /// - [`CapstackError::DuplicateDebtType`] for a type listed twice
    /// - [`CapstackError::DegenerateCoverage`] when a candidate has a zero
    ///   interest payment under the rejecting policy
    /// - [`CapstackError::OptimizationFailure`] if the search does not converge
    /// - [`CapstackError::Math`] if the objective is not finite at the start
    pub fn optimize_report<S: AsRef<str>>(
        &self,
        debt_types: &[S],
    ) -> CapstackResult<AllocationReport> {
        let tranches = self.resolve(debt_types)?;
        let seed = self.config.initial_guess;

        debug!(
            tranches = tranches.len(),
            initial_guess = seed,
            policy = %self.config.zero_interest,
            "starting allocation search"
        );

        let negated_worst = |u: &[f64]| -> CapstackResult<f64> {
            let mut worst = f64::INFINITY;
            for (&ui, (debt_type, rate)) in u.iter().zip(&tranches) {
                let coverage = self
                    .simulator
                    .coverage_at_rate(debt_type.as_str(), ui * seed, *rate)?;
                worst = worst.min(coverage);
            }
            Ok(-worst)
        };

        let initial = vec![1.0; tranches.len()];
        let start = negated_worst(&initial)?;
        let scale = if start.is_finite() && start != 0.0 {
            start.abs()
        } else {
            1.0
        };
        debug!(start, scale, "objective normalized at initial guess");

        let objective = |u: &[f64]| negated_worst(u).map(|f| f / scale);
        let bounds = vec![Bounds::non_negative(); tranches.len()];
        let mut result =
            projected_gradient(objective, &initial, &bounds, &self.config.solver_config())?;
        result.evaluations += 1;

        if !result.converged {
            warn!(
                iterations = result.iterations,
                residual = result.residual,
                "allocation search did not converge"
            );
            return Err(CapstackError::OptimizationFailure {
                iterations: result.iterations,
                residual: result.residual,
            });
        }

        if result.objective_value.is_finite()
            && self.config.zero_interest == ZeroInterestPolicy::Unbounded
        {
            let corner = vec![0.0; tranches.len()];
            let corner_value = negated_worst(&corner)? / scale;
            result.evaluations += 1;
            if corner_value < result.objective_value {
                debug!(
                    plateau = result.objective_value,
                    corner = corner_value,
                    "zero allocation improves on the search result"
                );
                result.parameters = corner;
                result.objective_value = corner_value;
            }
        }

        let mut amounts = Vec::with_capacity(tranches.len());
        let mut outcomes = Vec::with_capacity(tranches.len());
        for (&ui, (debt_type, rate)) in result.parameters.iter().zip(tranches) {
            let scaled = ui * seed;
            // Normalizes -0.0 as well.
            let amount = if scaled > 0.0 { scaled } else { 0.0 };
            let worst_coverage = self
                .simulator
                .coverage_at_rate(debt_type.as_str(), amount, rate)?;
            let binding_period = self.simulator.binding_period(amount, debt_type.as_str())?;

            outcomes.push(TrancheOutcome {
                debt_type: debt_type.clone(),
                amount,
                rate,
                interest_payment: amount * rate,
                worst_coverage,
                binding_period,
            });
            amounts.push((debt_type, amount));
        }

        let worst_coverage = outcomes
            .iter()
            .map(|o| o.worst_coverage)
            .fold(f64::INFINITY, f64::min);

        info!(
            iterations = result.iterations,
            evaluations = result.evaluations,
            worst_coverage,
            "allocation search converged"
        );

        Ok(AllocationReport {
            allocation: DebtAllocation::from_entries(amounts),
            tranches: outcomes,
            worst_coverage,
            iterations: result.iterations,
            evaluations: result.evaluations,
        })
    }

    /// Resolves rates and rejects empty or repeated lists before any
    /// objective evaluation.
    fn resolve<S: AsRef<str>>(&self, debt_types: &[S]) -> CapstackResult<Vec<(DebtType, f64)>> {
        if debt_types.is_empty() {
            return Err(CapstackError::NoDebtTypes);
        }

        let rates = self.simulator.rates();
        let mut tranches: Vec<(DebtType, f64)> = Vec::with_capacity(debt_types.len());
        for name in debt_types {
            let name = name.as_ref();
            let (debt_type, rate) = rates
                .iter()
                .find(|(d, _)| d.as_str() == name)
                .ok_or_else(|| CapstackError::unknown_debt_type(name))?;
            if tranches.iter().any(|(d, _)| d == debt_type) {
                return Err(CapstackError::duplicate_debt_type(name));
            }
            tranches.push((debt_type.clone(), rate));
        }
        Ok(tranches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CashFlowSeries, RateTable};
    use capstack_config::ZeroInterestPolicy;
    use capstack_math::MathError;

    fn inputs() -> (CashFlowSeries, RateTable) {
        (
            CashFlowSeries::new(vec![100_000.0, 120_000.0, 140_000.0, 160_000.0]).unwrap(),
            RateTable::from_pairs([("senior", 0.05), ("mezzanine", 0.10)]).unwrap(),
        )
    }

    #[test]
    fn test_input_checks_precede_search() {
        let (flows, rates) = inputs();
        let config = OptimizerConfig::default();
        let optimizer = AllocationOptimizer::new(CoverageSimulator::new(&flows, &rates), &config);

        let empty: [&str; 0] = [];
        assert_eq!(optimizer.optimize(&empty).unwrap_err(), CapstackError::NoDebtTypes);
        assert_eq!(
            optimizer.optimize(&["senior", "junior"]).unwrap_err(),
            CapstackError::unknown_debt_type("junior")
        );
        assert_eq!(
            optimizer.optimize(&["senior", "senior"]).unwrap_err(),
            CapstackError::duplicate_debt_type("senior")
        );
    }

    #[test]
    fn test_allocation_follows_requested_order() {
        let (flows, rates) = inputs();
        let config = OptimizerConfig::default();
        let optimizer = AllocationOptimizer::new(CoverageSimulator::new(&flows, &rates), &config);

        let allocation = optimizer.optimize(&["mezzanine", "senior"]).unwrap();
        let order: Vec<_> = allocation.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(order, ["mezzanine", "senior"]);
        assert!(allocation.iter().all(|(_, a)| a >= 0.0 && a.is_sign_positive()));
    }

    #[test]
    fn test_report_is_consistent() {
        let (flows, rates) = inputs();
        let config = OptimizerConfig::default();
        let optimizer = AllocationOptimizer::new(CoverageSimulator::new(&flows, &rates), &config);

        let report = optimizer.optimize_report(&["senior", "mezzanine"]).unwrap();
        assert_eq!(report.tranches.len(), 2);
        assert!(report.evaluations > report.iterations);
        for outcome in &report.tranches {
            assert_eq!(report.allocation.get(outcome.debt_type.as_str()), Some(outcome.amount));
            assert!(outcome.worst_coverage >= report.worst_coverage);
        }
    }

    #[test]
    fn test_zero_rate_start_is_optimal() {
        let flows = CashFlowSeries::new(vec![100.0, 200.0]).unwrap();
        let rates = RateTable::from_pairs([("x", 0.0)]).unwrap();
        let config = OptimizerConfig::default();
        let optimizer = AllocationOptimizer::new(CoverageSimulator::new(&flows, &rates), &config);

        let report = optimizer.optimize_report(&["x"]).unwrap();
        assert_eq!(report.allocation.get("x"), Some(config.initial_guess));
        assert_eq!(report.worst_coverage, f64::INFINITY);
        assert_eq!(report.iterations, 0);
        assert_eq!(report.tranches[0].binding_period, None);
    }

    #[test]
    fn test_tiny_cash_flows_reach_zero_bound() {
        let flows = CashFlowSeries::new(vec![1e-4, 1.2e-4]).unwrap();
        let rates = RateTable::from_pairs([("senior", 0.05)]).unwrap();
        let config = OptimizerConfig::default();
        let optimizer = AllocationOptimizer::new(CoverageSimulator::new(&flows, &rates), &config);

        let report = optimizer.optimize_report(&["senior"]).unwrap();
        assert_eq!(report.allocation.get("senior"), Some(0.0));
        assert_eq!(report.worst_coverage, f64::INFINITY);
        assert!(report.iterations > 0);
    }

    #[test]
    fn test_zero_period_plateau_uses_zero_allocation() {
        // Any positive amount covers the empty period at exactly 0.
        let flows = CashFlowSeries::new(vec![0.0, 100_000.0]).unwrap();
        let (_, rates) = inputs();
        let config = OptimizerConfig::default();
        let optimizer = AllocationOptimizer::new(CoverageSimulator::new(&flows, &rates), &config);

        let report = optimizer.optimize_report(&["senior", "mezzanine"]).unwrap();
        assert_eq!(report.allocation.get("senior"), Some(0.0));
        assert_eq!(report.allocation.get("mezzanine"), Some(0.0));
        assert_eq!(report.worst_coverage, f64::INFINITY);
        assert!(report.tranches.iter().all(|t| t.binding_period.is_none()));
    }

    #[test]
    fn test_zero_period_plateau_kept_under_reject() {
        let flows = CashFlowSeries::new(vec![0.0, 100_000.0]).unwrap();
        let (_, rates) = inputs();
        let config = OptimizerConfig::default().with_zero_interest(ZeroInterestPolicy::Reject);
        let optimizer = AllocationOptimizer::new(CoverageSimulator::new(&flows, &rates), &config);

        let report = optimizer.optimize_report(&["senior", "mezzanine"]).unwrap();
        assert_eq!(report.allocation.get("senior"), Some(config.initial_guess));
        assert_eq!(report.allocation.get("mezzanine"), Some(config.initial_guess));
        assert_eq!(report.worst_coverage, 0.0);
        assert_eq!(report.iterations, 0);
    }

    #[test]
    fn test_zero_rate_rejected() {
        let flows = CashFlowSeries::new(vec![100.0, 200.0]).unwrap();
        let rates = RateTable::from_pairs([("x", 0.0)]).unwrap();
        let config = OptimizerConfig::default().with_zero_interest(ZeroInterestPolicy::Reject);
        let optimizer = AllocationOptimizer::new(CoverageSimulator::new(&flows, &rates), &config);

        assert!(matches!(
            optimizer.optimize(&["x"]).unwrap_err(),
            CapstackError::DegenerateCoverage { .. }
        ));
    }

    #[test]
    fn test_budget_exhaustion_is_failure() {
        // Negative cash flows reward ever larger debt; the search never settles.
        let flows = CashFlowSeries::new(vec![-100.0, -50.0]).unwrap();
        let rates = RateTable::from_pairs([("senior", 0.05)]).unwrap();
        let config = OptimizerConfig::default().with_max_iterations(10);
        let optimizer = AllocationOptimizer::new(CoverageSimulator::new(&flows, &rates), &config);

        assert!(matches!(
            optimizer.optimize(&["senior"]).unwrap_err(),
            CapstackError::OptimizationFailure { iterations: 10, .. }
        ));
    }

    #[test]
    fn test_overflowing_start_is_math_error() {
        // Coverage overflows to -inf, so the negated objective starts at +inf.
        let flows = CashFlowSeries::new(vec![-1e300]).unwrap();
        let rates = RateTable::from_pairs([("senior", 0.05)]).unwrap();
        let config = OptimizerConfig::default().with_initial_guess(1e-300);
        let optimizer = AllocationOptimizer::new(CoverageSimulator::new(&flows, &rates), &config);

        assert!(matches!(
            optimizer.optimize(&["senior"]).unwrap_err(),
            CapstackError::Math(MathError::NonFiniteObjective { .. })
        ));
    }
}
