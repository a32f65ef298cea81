//! # Capstack Core
//!
//! Coverage simulation and tranche allocation for the Capstack debt
//! structuring library.
//!
//! Given projected per-period cash flows and a periodic interest rate for
//! each debt tranche, this crate:
//!
//! - **Simulates coverage**: the worst-period interest coverage ratio of a
//!   debt amount at a tranche's rate
//! - **Optimizes allocations**: searches non-negative tranche amounts for the
//!   allocation with the best worst-case coverage across tranches
//! - **Recommends**: runs the search over every tranche in the rate table,
//!   one model at a time or in parallel batches
//!
//! ## Example
//!
//! ```rust
//! use capstack_core::prelude::*;
//!
//! let model = DebtModel::new(
//!     CashFlowSeries::new(vec![100_000.0, 120_000.0, 140_000.0, 160_000.0])?,
//!     RateTable::from_pairs([("senior", 0.05), ("mezzanine", 0.10)])?,
//! );
//!
//! let coverage = model.simulate(1_000_000.0, "mezzanine")?;
//! assert_eq!(coverage, 1.0);
//!
//! let report = model.recommend_report()?;
//! for tranche in &report.tranches {
//!     assert!(tranche.amount >= 0.0);
//! }
//! # Ok::<(), CapstackError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::float_cmp)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::uninlined_format_args)]

pub mod batch;
pub mod coverage;
pub mod error;
pub mod model;
pub mod optimizer;
pub mod types;

pub use error::{CapstackError, CapstackResult};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::batch::{recommend_batch, recommend_batch_reports, BatchSummary};
    pub use crate::coverage::CoverageSimulator;
    pub use crate::error::{CapstackError, CapstackResult};
    pub use crate::model::{DebtModel, ModelInput};
    pub use crate::optimizer::AllocationOptimizer;
    pub use crate::types::{
        AllocationReport, CashFlowSeries, DebtAllocation, DebtType, RateTable, TrancheOutcome,
    };
    pub use capstack_config::{OptimizerConfig, ZeroInterestPolicy};
}
