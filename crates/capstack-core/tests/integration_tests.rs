//! Integration tests for capstack-core.
//!
//! These tests drive the public model API end to end.

use approx::assert_relative_eq;
use capstack_core::prelude::*;

// =============================================================================
// TEST FIXTURES
// =============================================================================

fn cash_flows() -> CashFlowSeries {
    CashFlowSeries::new(vec![100_000.0, 120_000.0, 140_000.0, 160_000.0]).unwrap()
}

fn two_tranche_model() -> DebtModel {
    DebtModel::new(
        cash_flows(),
        RateTable::from_pairs([("senior", 0.05), ("mezzanine", 0.10)]).unwrap(),
    )
}

fn zero_rate_model(policy: ZeroInterestPolicy) -> DebtModel {
    DebtModel::new(cash_flows(), RateTable::from_pairs([("x", 0.0)]).unwrap())
        .with_config(OptimizerConfig::default().with_zero_interest(policy))
        .unwrap()
}

// =============================================================================
// END-TO-END
// =============================================================================

#[test]
fn test_recommend_two_tranches() {
    let model = two_tranche_model();
    let report = model.recommend_report().unwrap();

    assert_eq!(report.allocation.len(), 2);
    assert_eq!(report.allocation.get("senior"), Some(0.0));
    assert_eq!(report.allocation.get("mezzanine"), Some(0.0));

    // Both tranches reach the zero bound, where coverage is unbounded.
    let senior = model
        .simulate(report.allocation.get("senior").unwrap(), "senior")
        .unwrap();
    let mezzanine = model
        .simulate(report.allocation.get("mezzanine").unwrap(), "mezzanine")
        .unwrap();
    assert_eq!(senior, f64::INFINITY);
    assert_eq!(mezzanine, f64::INFINITY);
    assert_eq!(report.worst_coverage, f64::INFINITY);
}

#[test]
fn test_recommend_matches_report() {
    let model = two_tranche_model();
    assert_eq!(
        model.recommend().unwrap(),
        model.recommend_report().unwrap().allocation
    );
}

#[test]
fn test_recommend_is_idempotent() {
    let model = two_tranche_model();
    assert_eq!(model.recommend().unwrap(), model.recommend().unwrap());
}

#[test]
fn test_optimize_subset() {
    let model = DebtModel::new(
        cash_flows(),
        RateTable::from_pairs([("senior", 0.05), ("mezzanine", 0.10), ("junior", 0.14)]).unwrap(),
    );

    let allocation = model.optimize(&["junior", "senior"]).unwrap();
    let order: Vec<_> = allocation.iter().map(|(d, _)| d.as_str()).collect();
    assert_eq!(order, ["junior", "senior"]);
    assert_eq!(allocation.get("mezzanine"), None);
}

#[test]
fn test_simulate_closed_form() {
    let model = two_tranche_model();
    assert_relative_eq!(model.simulate(500_000.0, "senior").unwrap(), 4.0);
    assert_relative_eq!(model.simulate(250_000.0, "mezzanine").unwrap(), 4.0);
}

// =============================================================================
// ZERO-RATE BOUNDARY
// =============================================================================

#[test]
fn test_zero_rate_unbounded() {
    let model = zero_rate_model(ZeroInterestPolicy::Unbounded);

    assert_eq!(model.simulate(1_000.0, "x").unwrap(), f64::INFINITY);

    let report = model.recommend_report().unwrap();
    assert_eq!(report.allocation.get("x"), Some(1_000_000.0));
    assert_eq!(report.worst_coverage, f64::INFINITY);
    assert_eq!(report.tranches[0].interest_payment, 0.0);
}

#[test]
fn test_zero_rate_reject() {
    let model = zero_rate_model(ZeroInterestPolicy::Reject);

    assert!(matches!(
        model.simulate(1_000.0, "x"),
        Err(CapstackError::DegenerateCoverage { .. })
    ));
    assert!(matches!(
        model.recommend(),
        Err(CapstackError::DegenerateCoverage { .. })
    ));
}

#[test]
fn test_reject_fails_on_positive_cash_flows() {
    // The search drives tranches toward zero debt, which Reject refuses.
    let model = two_tranche_model()
        .with_config(OptimizerConfig::default().with_zero_interest(ZeroInterestPolicy::Reject))
        .unwrap();

    assert!(model.simulate(1_000_000.0, "senior").is_ok());
    assert!(matches!(
        model.recommend(),
        Err(CapstackError::DegenerateCoverage { amount, .. }) if amount == 0.0
    ));
}

#[test]
fn test_zero_period_recommends_zero_debt() {
    let model = DebtModel::new(
        CashFlowSeries::new(vec![0.0, 100_000.0]).unwrap(),
        RateTable::from_pairs([("senior", 0.05), ("mezzanine", 0.10)]).unwrap(),
    );

    let report = model.recommend_report().unwrap();
    assert_eq!(report.allocation.get("senior"), Some(0.0));
    assert_eq!(report.allocation.get("mezzanine"), Some(0.0));
    assert_eq!(report.worst_coverage, f64::INFINITY);
}

// =============================================================================
// ERROR SCENARIOS
// =============================================================================

#[test]
fn test_unknown_debt_type() {
    let model = two_tranche_model();

    assert_eq!(
        model.simulate(1000.0, "unknown_type").unwrap_err(),
        CapstackError::unknown_debt_type("unknown_type")
    );
    assert_eq!(
        model.optimize(&["senior", "unknown_type"]).unwrap_err(),
        CapstackError::unknown_debt_type("unknown_type")
    );
}

#[test]
fn test_empty_cash_flows() {
    assert_eq!(
        DebtModel::from_raw(Vec::new(), [("senior", 0.05)]).unwrap_err(),
        CapstackError::EmptyCashFlowSeries
    );
}

#[test]
fn test_empty_rate_table_has_nothing_to_recommend() {
    let model = DebtModel::new(cash_flows(), RateTable::new());
    assert_eq!(model.recommend().unwrap_err(), CapstackError::NoDebtTypes);
}

#[test]
fn test_negative_cash_flows_do_not_converge() {
    let model = DebtModel::from_raw(vec![-100.0, -50.0], [("senior", 0.05)]).unwrap();

    assert!(matches!(
        model.recommend(),
        Err(CapstackError::OptimizationFailure { iterations: 200, .. })
    ));
}

// =============================================================================
// BATCH
// =============================================================================

#[test]
fn test_batch_matches_sequential() {
    let models = vec![
        two_tranche_model(),
        zero_rate_model(ZeroInterestPolicy::Unbounded),
        zero_rate_model(ZeroInterestPolicy::Reject),
    ];

    let batch = recommend_batch(&models);
    let sequential: Vec<_> = models.iter().map(DebtModel::recommend).collect();
    assert_eq!(batch, sequential);

    let summary = BatchSummary::from_results(&batch);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
}

#[test]
fn test_batch_reports() {
    let models = vec![two_tranche_model(); 4];
    let reports = recommend_batch_reports(&models);

    assert_eq!(reports.len(), 4);
    for report in &reports {
        assert_eq!(report.as_ref().unwrap(), reports[0].as_ref().unwrap());
    }
}
