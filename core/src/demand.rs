//! Demand computation: forecast volumes to required headcount.
//!
//! Each workload stream is staffed independently:
//!   headcount = max(1, round(workload_minutes / effective_minutes))
//! for every stream with positive workload, 0 otherwise.
//! Rounding is half-to-even throughout.
//!
//! Loading is two streams (staged pallets, forecasted shipping pallets)
//! summed after rounding, so a day with both needs at least 2 loaders.

use crate::{
    config::{ForecastMetrics, PlannerConfig},
    error::{PlanError, PlanResult},
    forecast::ForecastDay,
    requirement::{
        Operation, RoleRequirement, BENDI_DRIVER, FORKLIFT_DRIVER, GENERAL_LABOR, RECEIVER, STAFF,
    },
    types::Headcount,
};

/// Shift and conversion constants the engine needs besides the rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandPolicy {
    pub hours_per_shift: f64,
    pub efficiency: f64,
    pub cases_per_pallet: f64,
    pub replenishment_ratio: f64,
}

impl DemandPolicy {
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            hours_per_shift: config.shift.hours_per_shift,
            efficiency: config.shift.efficiency,
            cases_per_pallet: config.cases_per_pallet,
            replenishment_ratio: config.replenishment_ratio,
        }
    }

    pub fn effective_minutes(&self) -> f64 {
        self.hours_per_shift * 60.0 * self.efficiency
    }
}

/// Raw per-stream headcounts before they are bucketed by operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct StreamCounts {
    forklift_inbound: Headcount,
    scanner_inbound: Headcount,
    bendi_inbound: Headcount,
    bendi_picking: Headcount,
    scanner_picking: Headcount,
    packer_wrapping: Headcount,
    forklift_loading: Headcount,
    picker: Headcount,
}

impl StreamCounts {
    fn total(&self) -> Headcount {
        self.forklift_inbound
            + self.forklift_loading
            + self.bendi_inbound
            + self.bendi_picking
            + self.scanner_inbound
            + self.scanner_picking
            + self.packer_wrapping
            + self.picker
    }
}

/// Compute the requirement for one day. Never fails: any error degrades
/// to [`RoleRequirement::fallback`].
pub fn compute_requirements(
    metrics: &ForecastMetrics,
    day: &ForecastDay,
    policy: &DemandPolicy,
) -> RoleRequirement {
    compute_requirements_or_fallback(metrics, day, policy).0
}

/// As [`compute_requirements`], also returning the error that forced
/// the fallback, if any.
pub fn compute_requirements_or_fallback(
    metrics: &ForecastMetrics,
    day: &ForecastDay,
    policy: &DemandPolicy,
) -> (RoleRequirement, Option<PlanError>) {
    match try_compute_requirements(metrics, day, policy) {
        Ok(req) => (req, None),
        Err(e) => {
            log::warn!("demand: computation failed, using fallback requirement: {e}");
            (RoleRequirement::fallback(), Some(e))
        }
    }
}

/// Fallible core of [`compute_requirements`].
pub fn try_compute_requirements(
    metrics: &ForecastMetrics,
    day: &ForecastDay,
    policy: &DemandPolicy,
) -> PlanResult<RoleRequirement> {
    metrics.validate()?;
    day.validate()?;

    let capacity = policy.effective_minutes();
    if !(capacity.is_finite() && capacity > 0.0) {
        return Err(anyhow::anyhow!("effective minutes per worker must be positive, got {capacity}").into());
    }
    if !(policy.cases_per_pallet.is_finite() && policy.cases_per_pallet > 0.0) {
        return Err(anyhow::anyhow!("cases_per_pallet must be positive, got {}", policy.cases_per_pallet).into());
    }

    let calculated_shipping = round_to(day.order_qty / policy.cases_per_pallet, 2);
    let shipping_pallets = day.shipping_pallets + calculated_shipping;
    let mut counts = StreamCounts::default();

    if let Some(inbound) = &metrics.inbound {
        let pallets = day.incoming_pallets;
        counts.forklift_inbound = headcount("forklift_driver_inbound", pallets * inbound.offload(), capacity)?;
        counts.scanner_inbound = headcount("scanner_inbound", pallets * inbound.scan(), capacity)?;
        counts.bendi_inbound = headcount("bendi_driver_inbound", pallets * inbound.putaway(), capacity)?;
    }

    if let Some(picking) = &metrics.picking {
        counts.bendi_picking = headcount("bendi_driver_picking", shipping_pallets * picking.pick(), capacity)?;
        counts.scanner_picking = headcount("scanner_picking", shipping_pallets * picking.scan(), capacity)?;
        counts.packer_wrapping = headcount("packer_wrapping", shipping_pallets * picking.wrap(), capacity)?;
    }

    if let Some(load) = &metrics.load {
        let per_pallet = load.load();
        let staged = headcount("forklift_driver_staged", day.staged_pallets * per_pallet, capacity)?;
        let forecast = headcount("forklift_driver_forecast", shipping_pallets * per_pallet, capacity)?;
        counts.forklift_loading = staged + forecast;
    }

    let total = counts.total();
    let replenishment = Headcount::max(
        1,
        to_headcount("staff", f64::from(total) * policy.replenishment_ratio)?,
    );

    log::debug!(
        "demand: capacity={capacity:.1}min shipping={shipping_pallets} (calculated {calculated_shipping}) \
         total={total} replenishment={replenishment}"
    );

    let mut req = RoleRequirement::new();
    req.set(Operation::Inbound, FORKLIFT_DRIVER, counts.forklift_inbound);
    req.set(Operation::Inbound, RECEIVER, counts.scanner_inbound);
    req.set(Operation::Inbound, BENDI_DRIVER, counts.bendi_inbound);
    req.set(Operation::Picking, BENDI_DRIVER, counts.bendi_picking);
    req.set(Operation::Picking, GENERAL_LABOR, counts.scanner_picking + counts.packer_wrapping);
    req.set(Operation::Loading, FORKLIFT_DRIVER, counts.forklift_loading);
    req.set(Operation::Replenishment, STAFF, replenishment);
    Ok(req)
}

/// Headcount for one workload stream: 0 without workload, otherwise at
/// least 1.
fn headcount(stream: &str, workload_minutes: f64, capacity: f64) -> PlanResult<Headcount> {
    if workload_minutes <= 0.0 {
        return Ok(0);
    }
    Ok(to_headcount(stream, workload_minutes / capacity)?.max(1))
}

fn to_headcount(stream: &str, workers: f64) -> PlanResult<Headcount> {
    let rounded = workers.round_ties_even();
    if !rounded.is_finite() || rounded < 0.0 || rounded > f64::from(Headcount::MAX) {
        return Err(PlanError::HeadcountOverflow {
            role: stream.to_string(),
            minutes: workers,
        });
    }
    Ok(rounded as Headcount)
}

/// Round to `decimals` places, half-to-even on the exact binary value.
///
/// The scaled product can land on `.5` even when the stored value lies
/// just below or above it (2.675 is 2.67499..); the fused residue of the
/// multiplication breaks those false ties.
fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    let scaled = value * scale;
    let residue = value.mul_add(scale, -scaled);
    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 && residue != 0.0 {
        if residue > 0.0 { scaled.ceil() } else { scaled.floor() }
    } else {
        scaled.round_ties_even()
    };
    rounded / scale
}
