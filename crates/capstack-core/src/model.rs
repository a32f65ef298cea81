//! Debt model: the entry point tying inputs, configuration and search together.

use serde::{Deserialize, Serialize};

use capstack_config::{OptimizerConfig, Validate};

use crate::coverage::CoverageSimulator;
use crate::error::{CapstackError, CapstackResult};
use crate::optimizer::AllocationOptimizer;
use crate::types::{AllocationReport, CashFlowSeries, DebtAllocation, RateTable};

/// Immutable context for coverage simulation and allocation search.
///
/// A model owns its cash flows, rate table and optimizer configuration and
/// never mutates them, so repeated calls give identical results and a model
/// can be shared across threads.
///
/// # Example
///
/// ```rust
/// use capstack_core::model::DebtModel;
/// use capstack_core::types::{CashFlowSeries, RateTable};
///
/// let model = DebtModel::new(
///     CashFlowSeries::new(vec![100_000.0, 120_000.0, 140_000.0, 160_000.0]).unwrap(),
///     RateTable::from_pairs([("senior", 0.05), ("mezzanine", 0.10)]).unwrap(),
/// );
///
/// assert_eq!(model.simulate(1_000_000.0, "senior").unwrap(), 2.0);
///
/// let allocation = model.recommend().unwrap();
/// assert_eq!(allocation.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DebtModel {
    cash_flows: CashFlowSeries,
    rates: RateTable,
    config: OptimizerConfig,
}

impl DebtModel {
    /// Creates a model with the default optimizer configuration.
    pub fn new(cash_flows: CashFlowSeries, rates: RateTable) -> Self {
        Self {
            cash_flows,
            rates,
            config: OptimizerConfig::default(),
        }
    }

    /// Creates a model from raw cash flows and `(identifier, rate)` pairs.
    pub fn from_raw<I, K>(cash_flows: Vec<f64>, rates: I) -> CapstackResult<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Ok(Self::new(
            CashFlowSeries::new(cash_flows)?,
            RateTable::from_pairs(rates)?,
        ))
    }

    /// Replaces the optimizer configuration after validating it.
    pub fn with_config(mut self, config: OptimizerConfig) -> CapstackResult<Self> {
        config.validate_or_error()?;
        self.config = config;
        Ok(self)
    }

    /// Cash flow projections.
    pub fn cash_flows(&self) -> &CashFlowSeries {
        &self.cash_flows
    }

    /// Interest rates by tranche.
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Optimizer configuration.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Simulator bound to this model's inputs and zero-interest policy.
    pub fn simulator(&self) -> CoverageSimulator<'_> {
        CoverageSimulator::new(&self.cash_flows, &self.rates).with_policy(self.config.zero_interest)
    }

    /// Optimizer bound to this model's inputs and configuration.
    pub fn optimizer(&self) -> AllocationOptimizer<'_> {
        AllocationOptimizer::new(self.simulator(), &self.config)
    }

    /// Worst-period coverage ratio for `debt_amount` of `debt_type`.
    ///
    /// # Errors
    ///
    /// [`CapstackError::InvalidAmount`] for a negative or non-finite amount,
    /// otherwise as [`CoverageSimulator::simulate`].
    pub fn simulate(&self, debt_amount: f64, debt_type: &str) -> CapstackResult<f64> {
        check_amount(debt_amount)?;
        self.simulator().simulate(debt_amount, debt_type)
    }

    /// Per-period coverage ratios for `debt_amount` of `debt_type`.
    pub fn coverage_profile(&self, debt_amount: f64, debt_type: &str) -> CapstackResult<Vec<f64>> {
        check_amount(debt_amount)?;
        self.simulator().coverage_profile(debt_amount, debt_type)
    }

    /// Optimal allocation across the given tranches.
    pub fn optimize<S: AsRef<str>>(&self, debt_types: &[S]) -> CapstackResult<DebtAllocation> {
        self.optimizer().optimize(debt_types)
    }

    /// Optimal allocation across the given tranches, with diagnostics.
    pub fn optimize_report<S: AsRef<str>>(
        &self,
        debt_types: &[S],
    ) -> CapstackResult<AllocationReport> {
        self.optimizer().optimize_report(debt_types)
    }

    /// Optimal allocation across every tranche in the rate table, in
    /// declaration order.
    pub fn recommend(&self) -> CapstackResult<DebtAllocation> {
        self.recommend_report().map(|report| report.allocation)
    }

    /// Report form of [`recommend`](Self::recommend).
    pub fn recommend_report(&self) -> CapstackResult<AllocationReport> {
        let debt_types: Vec<&str> = self.rates.debt_types().map(|d| d.as_str()).collect();
        self.optimize_report(&debt_types)
    }
}

fn check_amount(debt_amount: f64) -> CapstackResult<()> {
    if debt_amount.is_finite() && debt_amount >= 0.0 {
        Ok(())
    } else {
        Err(CapstackError::InvalidAmount {
            amount: debt_amount,
        })
    }
}

/// Serialized form of a model.
///
/// ```json
/// {
///   "cash_flows": [100000, 120000],
///   "interest_rates": {"senior": 0.05, "mezzanine": 0.10},
///   "optimizer": {"max_iterations": 500}
/// }
/// ```
///
/// `optimizer` is optional; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelInput {
    /// Per-period cash flows.
    pub cash_flows: CashFlowSeries,
    /// Tranche rates, in declaration order.
    pub interest_rates: RateTable,
    /// Optional optimizer settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<OptimizerConfig>,
}

impl ModelInput {
    /// Parses a JSON document.
    pub fn from_json_str(input: &str) -> CapstackResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Builds the model, validating any optimizer settings.
    pub fn into_model(self) -> CapstackResult<DebtModel> {
        let model = DebtModel::new(self.cash_flows, self.interest_rates);
        match self.optimizer {
            Some(config) => model.with_config(config),
            None => Ok(model),
        }
    }
}

impl TryFrom<ModelInput> for DebtModel {
    type Error = CapstackError;

    fn try_from(input: ModelInput) -> Result<Self, Self::Error> {
        input.into_model()
    }
}
