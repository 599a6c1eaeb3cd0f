//! Demand engine: forecast volumes to role requirements.

use staffing_core::{
    config::{ForecastMetrics, InboundRates, LoadRates, PlannerConfig},
    demand::{compute_requirements, try_compute_requirements, DemandPolicy},
    error::PlanError,
    forecast::ForecastDay,
    requirement::{
        Operation, RoleRequirement, BENDI_DRIVER, FORKLIFT_DRIVER, GENERAL_LABOR, RECEIVER, STAFF,
    },
};

fn policy() -> DemandPolicy {
    DemandPolicy::from_config(&PlannerConfig::default_test())
}

fn day(incoming: f64, shipping: f64, cases: f64, staged: f64) -> ForecastDay {
    ForecastDay {
        incoming_pallets: incoming,
        shipping_pallets: shipping,
        order_qty: cases,
        cases_to_pick: cases,
        staged_pallets: staged,
    }
}

/// 3750 cases at 75 per pallet is 50 shipping pallets; every role is staffed.
#[test]
fn end_to_end_scenario_staffs_every_role() {
    let metrics = ForecastMetrics::standard();
    let req = compute_requirements(&metrics, &day(100.0, 0.0, 3750.0, 20.0), &policy());

    assert_eq!(req.get(Operation::Inbound, FORKLIFT_DRIVER), 1);
    assert_eq!(req.get(Operation::Inbound, RECEIVER), 1);
    assert_eq!(req.get(Operation::Inbound, BENDI_DRIVER), 1);
    assert_eq!(req.get(Operation::Picking, BENDI_DRIVER), 1);
    assert_eq!(req.get(Operation::Picking, GENERAL_LABOR), 2, "scan and wrap are separate streams");
    assert_eq!(req.get(Operation::Loading, FORKLIFT_DRIVER), 2, "staged and forecast loading");
    assert_eq!(req.get(Operation::Replenishment, STAFF), 1);
    assert_eq!(req.total(), 9);
}

/// Only inbound rates configured: inbound staffed, picking and loading zero.
#[test]
fn inbound_only_metrics_leave_other_operations_at_zero() {
    let metrics = ForecastMetrics {
        inbound: Some(InboundRates {
            avg_offload_time: Some(2.5),
            avg_scan_time: Some(0.15),
            avg_putaway_time: Some(2.5),
        }),
        picking: None,
        load: None,
    };
    let req = compute_requirements(&metrics, &day(100.0, 0.0, 3750.0, 20.0), &policy());

    assert_eq!(req.get(Operation::Inbound, FORKLIFT_DRIVER), 1);
    assert_eq!(req.get(Operation::Inbound, RECEIVER), 1);
    assert_eq!(req.get(Operation::Inbound, BENDI_DRIVER), 1);
    assert_eq!(req.get(Operation::Picking, BENDI_DRIVER), 0);
    assert_eq!(req.get(Operation::Loading, FORKLIFT_DRIVER), 0);
    assert_eq!(req.get(Operation::Replenishment, STAFF), 1);
    assert!(req.roles(Operation::Picking).is_some(), "shape is fixed even when zero");
}

/// 10 staged and 50 shipping pallets each round to one loader.
#[test]
fn loading_streams_are_summed_after_rounding() {
    let metrics = ForecastMetrics {
        inbound: None,
        picking: None,
        load: Some(LoadRates { avg_load_time_per_pallet: Some(2.5) }),
    };
    let req = compute_requirements(&metrics, &day(0.0, 50.0, 0.0, 10.0), &policy());
    assert_eq!(req.get(Operation::Loading, FORKLIFT_DRIVER), 2);
}

/// Staged pallets alone still need a loader.
#[test]
fn staged_pallets_without_shipping_need_a_loader() {
    let req = compute_requirements(&ForecastMetrics::standard(), &day(0.0, 0.0, 0.0, 5.0), &policy());
    assert_eq!(req.get(Operation::Loading, FORKLIFT_DRIVER), 1);
    assert_eq!(req.get(Operation::Picking, BENDI_DRIVER), 0);
}

/// An empty day needs only the replenishment floor.
#[test]
fn zero_volume_day_needs_one_replenishment_worker() {
    let req = compute_requirements(&ForecastMetrics::standard(), &ForecastDay::default(), &policy());
    assert_eq!(req.total(), 1);
    assert_eq!(req.get(Operation::Replenishment, STAFF), 1);
    assert_eq!(req.get(Operation::Inbound, FORKLIFT_DRIVER), 0);
}

/// More volume never means fewer people.
#[test]
fn headcount_is_monotonic_in_volume() {
    let metrics = ForecastMetrics::standard();
    let mut previous = 0;
    for pallets in [0.0, 10.0, 100.0, 250.0, 500.0, 1000.0, 4000.0] {
        let total = compute_requirements(&metrics, &day(pallets, pallets, 0.0, pallets), &policy()).total();
        assert!(total >= previous, "{pallets} pallets: {total} < {previous}");
        previous = total;
    }
}

/// Large volumes scale linearly with effective minutes.
#[test]
fn heavy_inbound_scales_with_capacity() {
    // 1000 pallets * 2.5 min / 382.5 min = 6.54 -> 7
    let req = compute_requirements(&ForecastMetrics::standard(), &day(1000.0, 0.0, 0.0, 0.0), &policy());
    assert_eq!(req.get(Operation::Inbound, FORKLIFT_DRIVER), 7);
    assert_eq!(req.get(Operation::Inbound, BENDI_DRIVER), 7);
}

/// A negative rate degrades to the fallback requirement.
#[test]
fn invalid_rate_falls_back() {
    let mut metrics = ForecastMetrics::standard();
    metrics.inbound.as_mut().unwrap().avg_offload_time = Some(-1.0);

    let err = try_compute_requirements(&metrics, &day(100.0, 0.0, 0.0, 0.0), &policy()).unwrap_err();
    assert!(matches!(err, PlanError::InvalidRate { .. }), "got {err}");

    let req = compute_requirements(&metrics, &day(100.0, 0.0, 0.0, 0.0), &policy());
    assert_eq!(req, RoleRequirement::fallback());
}

/// A non-finite forecast value degrades to the fallback requirement.
#[test]
fn invalid_forecast_falls_back() {
    let req = compute_requirements(&ForecastMetrics::standard(), &day(f64::NAN, 0.0, 0.0, 0.0), &policy());
    assert_eq!(req, RoleRequirement::fallback());
}

/// Zero cases per pallet is rejected rather than dividing by zero.
#[test]
fn zero_cases_per_pallet_falls_back() {
    let mut policy = policy();
    policy.cases_per_pallet = 0.0;
    let result = try_compute_requirements(&ForecastMetrics::standard(), &day(10.0, 0.0, 750.0, 0.0), &policy);
    assert!(result.is_err());
}
