//! Forecast collaborator contract and daily forecast aggregation.
//!
//! The order-management system is external; the planner only sees it
//! through [`ForecastSource`]. Aggregation turns its raw order lists into
//! one [`ForecastDay`] per planning date.

use crate::error::{PlanError, PlanResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Picking types whose orders are counted as loose cases to pick.
pub const CASE_PICKING_TYPES: [&str; 2] = ["PIECE_PICK", "CASE_PICK"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutboundOrder {
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub pallet_qty: f64,
    #[serde(default)]
    pub order_qty: f64,
    #[serde(default)]
    pub picking_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PickedOrder {
    #[serde(default)]
    pub pallet_qty: f64,
}

/// External order-management API. Blocking request/response;
/// retries are the implementation's business.
pub trait ForecastSource {
    fn get_outbound_orders(&self, date: NaiveDate) -> PlanResult<Vec<OutboundOrder>>;
    fn get_picked_outbound_orders(&self, date: NaiveDate) -> PlanResult<Vec<PickedOrder>>;
    fn get_incoming_pallets(&self, date: NaiveDate) -> PlanResult<f64>;
}

/// Forecast volumes for one planning day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub incoming_pallets: f64,
    pub shipping_pallets: f64,
    /// Total ordered cases.
    pub order_qty: f64,
    pub cases_to_pick: f64,
    /// Already-picked pallets waiting to be loaded.
    pub staged_pallets: f64,
}

impl ForecastDay {
    /// Every count must be finite and non-negative.
    pub fn validate(&self) -> PlanResult<()> {
        let fields = [
            ("incoming_pallets", self.incoming_pallets),
            ("shipping_pallets", self.shipping_pallets),
            ("order_qty", self.order_qty),
            ("cases_to_pick", self.cases_to_pick),
            ("staged_pallets", self.staged_pallets),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(PlanError::InvalidForecast { field: field.into(), value });
            }
        }
        Ok(())
    }

    /// Fold raw collaborator data into a forecast day.
    pub fn aggregate(
        outbound: &[OutboundOrder],
        picked: &[PickedOrder],
        incoming_pallets: f64,
    ) -> Self {
        let cases_to_pick = outbound
            .iter()
            .filter(|o| CASE_PICKING_TYPES.contains(&o.picking_type.as_str()) && o.pallet_qty == 0.0)
            .map(|o| o.order_qty)
            .sum();

        Self {
            incoming_pallets: incoming_pallets.round_ties_even(),
            shipping_pallets: outbound.iter().map(|o| o.pallet_qty).sum(),
            order_qty: outbound.iter().map(|o| o.order_qty).sum(),
            cases_to_pick,
            staged_pallets: picked.iter().map(|o| o.pallet_qty).sum(),
        }
    }
}

/// Query every forecast collaborator for `date` and aggregate the result.
/// Any collaborator failure fails the whole day.
pub fn gather_forecast(source: &dyn ForecastSource, date: NaiveDate) -> PlanResult<ForecastDay> {
    let outbound = source.get_outbound_orders(date)?;
    let picked = source.get_picked_outbound_orders(date)?;
    log::debug!(
        "date={date} forecast: {} outbound orders, {} picked orders",
        outbound.len(),
        picked.len()
    );

    let incoming = source.get_incoming_pallets(date)?;
    let day = ForecastDay::aggregate(&outbound, &picked, incoming);
    day.validate()?;

    log::info!(
        "date={date} forecast: incoming={} shipping={} cases={} to_pick={} staged={}",
        day.incoming_pallets,
        day.shipping_pallets,
        day.order_qty,
        day.cases_to_pick,
        day.staged_pallets
    );
    Ok(day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, pallets: f64, cases: f64, picking_type: &str) -> OutboundOrder {
        OutboundOrder {
            order_id: id.into(),
            pallet_qty: pallets,
            order_qty: cases,
            picking_type: picking_type.into(),
        }
    }

    #[test]
    fn loose_case_orders_count_toward_cases_to_pick() {
        let outbound = vec![
            order("A", 0.0, 120.0, "CASE_PICK"),
            order("B", 4.0, 300.0, "CASE_PICK"),
            order("C", 0.0, 30.0, "PIECE_PICK"),
            order("D", 0.0, 500.0, "PALLET_PICK"),
        ];
        let picked = vec![PickedOrder { pallet_qty: 6.0 }, PickedOrder { pallet_qty: 2.0 }];

        let day = ForecastDay::aggregate(&outbound, &picked, 41.6);

        assert_eq!(day.cases_to_pick, 150.0);
        assert_eq!(day.shipping_pallets, 4.0);
        assert_eq!(day.order_qty, 950.0);
        assert_eq!(day.staged_pallets, 8.0);
        assert_eq!(day.incoming_pallets, 42.0);
    }

    #[test]
    fn negative_count_is_invalid() {
        let day = ForecastDay { staged_pallets: -1.0, ..Default::default() };
        assert!(matches!(day.validate(), Err(PlanError::InvalidForecast { .. })));
    }
}
