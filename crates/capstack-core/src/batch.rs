//! Parallel recommendation over independent models.

use rayon::prelude::*;
use tracing::debug;

use crate::error::CapstackResult;
use crate::model::DebtModel;
use crate::types::{AllocationReport, DebtAllocation};

/// Recommends an allocation for each model in parallel.
///
/// Results keep the order of `models`; a failing model does not affect the
/// others.
pub fn recommend_batch(models: &[DebtModel]) -> Vec<CapstackResult<DebtAllocation>> {
    debug!(models = models.len(), "running batch recommendation");
    models.par_iter().map(DebtModel::recommend).collect()
}

/// Report form of [`recommend_batch`].
pub fn recommend_batch_reports(models: &[DebtModel]) -> Vec<CapstackResult<AllocationReport>> {
    debug!(models = models.len(), "running batch recommendation");
    models.par_iter().map(DebtModel::recommend_report).collect()
}

/// Summary of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    /// Models that produced an allocation.
    pub succeeded: usize,
    /// Models that failed.
    pub failed: usize,
}

impl BatchSummary {
    /// Tallies a batch of results.
    pub fn from_results<T>(results: &[CapstackResult<T>]) -> Self {
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        Self {
            succeeded,
            failed: results.len() - succeeded,
        }
    }
}
