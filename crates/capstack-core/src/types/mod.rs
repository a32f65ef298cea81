//! Domain types for debt structuring.
//!
//! - [`DebtType`]: tranche identifier
//! - [`CashFlowSeries`]: projected per-period cash flows
//! - [`RateTable`]: ordered tranche-to-rate mapping
//! - [`DebtAllocation`]: ordered tranche-to-amount mapping
//! - [`AllocationReport`]: allocation plus per-tranche diagnostics

mod allocation;
mod cash_flows;
mod debt_type;
mod rates;

pub use allocation::{AllocationReport, DebtAllocation, TrancheOutcome};
pub use cash_flows::CashFlowSeries;
pub use debt_type::DebtType;
pub use rates::RateTable;
