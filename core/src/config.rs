use crate::{
    error::{PlanError, PlanResult},
    taxonomy::RoleTaxonomy,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Fallback rates (minutes per unit) ──────────────────────────────
//
// Used when an operation is configured but one of its metrics is not.

pub const DEFAULT_OFFLOAD_MINUTES: f64 = 2.15;
pub const DEFAULT_INBOUND_SCAN_MINUTES: f64 = 0.15;
pub const DEFAULT_PUTAWAY_MINUTES: f64 = 3.0;
pub const DEFAULT_PICK_MINUTES: f64 = 3.0;
pub const DEFAULT_PICKING_SCAN_MINUTES: f64 = 0.15;
pub const DEFAULT_WRAP_MINUTES: f64 = 0.75;
pub const DEFAULT_LOAD_MINUTES: f64 = 2.5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InboundRates {
    #[serde(default)]
    pub avg_offload_time: Option<f64>,
    #[serde(default)]
    pub avg_scan_time: Option<f64>,
    #[serde(default)]
    pub avg_putaway_time: Option<f64>,
}

impl InboundRates {
    pub fn offload(&self) -> f64 { self.avg_offload_time.unwrap_or(DEFAULT_OFFLOAD_MINUTES) }
    pub fn scan(&self) -> f64 { self.avg_scan_time.unwrap_or(DEFAULT_INBOUND_SCAN_MINUTES) }
    pub fn putaway(&self) -> f64 { self.avg_putaway_time.unwrap_or(DEFAULT_PUTAWAY_MINUTES) }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PickingRates {
    #[serde(default)]
    pub avg_pick_time: Option<f64>,
    #[serde(default)]
    pub avg_scan_time: Option<f64>,
    #[serde(default)]
    pub avg_wrap_time: Option<f64>,
}

impl PickingRates {
    pub fn pick(&self) -> f64 { self.avg_pick_time.unwrap_or(DEFAULT_PICK_MINUTES) }
    pub fn scan(&self) -> f64 { self.avg_scan_time.unwrap_or(DEFAULT_PICKING_SCAN_MINUTES) }
    pub fn wrap(&self) -> f64 { self.avg_wrap_time.unwrap_or(DEFAULT_WRAP_MINUTES) }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadRates {
    #[serde(default)]
    pub avg_load_time_per_pallet: Option<f64>,
}

impl LoadRates {
    pub fn load(&self) -> f64 {
        self.avg_load_time_per_pallet.unwrap_or(DEFAULT_LOAD_MINUTES)
    }
}

/// Per-operation productivity rates. An absent operation contributes
/// no workload at all; an absent metric falls back to its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    #[serde(default)]
    pub inbound: Option<InboundRates>,
    #[serde(default)]
    pub picking: Option<PickingRates>,
    #[serde(default, alias = "loading")]
    pub load: Option<LoadRates>,
}

impl ForecastMetrics {
    /// Every configured rate must be finite and non-negative.
    pub fn validate(&self) -> PlanResult<()> {
        let mut rates: Vec<(&str, &str, Option<f64>)> = Vec::new();
        if let Some(r) = &self.inbound {
            rates.push(("inbound", "avg_offload_time", r.avg_offload_time));
            rates.push(("inbound", "avg_scan_time", r.avg_scan_time));
            rates.push(("inbound", "avg_putaway_time", r.avg_putaway_time));
        }
        if let Some(r) = &self.picking {
            rates.push(("picking", "avg_pick_time", r.avg_pick_time));
            rates.push(("picking", "avg_scan_time", r.avg_scan_time));
            rates.push(("picking", "avg_wrap_time", r.avg_wrap_time));
        }
        if let Some(r) = &self.load {
            rates.push(("load", "avg_load_time_per_pallet", r.avg_load_time_per_pallet));
        }
        for (operation, metric, value) in rates {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(PlanError::InvalidRate {
                        operation: operation.into(),
                        metric: metric.into(),
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    /// Production defaults.
    pub fn standard() -> Self {
        Self {
            inbound: Some(InboundRates {
                avg_offload_time: Some(2.5),
                avg_scan_time: Some(0.15),
                avg_putaway_time: Some(2.5),
            }),
            picking: Some(PickingRates {
                avg_pick_time: Some(3.0),
                avg_scan_time: Some(0.15),
                avg_wrap_time: Some(0.75),
            }),
            load: Some(LoadRates {
                avg_load_time_per_pallet: Some(3.0),
            }),
        }
    }
}

/// Shift length, efficiency and the published shift window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftPolicy {
    pub hours_per_shift: f64,
    pub efficiency: f64,
    pub start_time: String,
    pub end_time: String,
    pub lunch_duration: String,
    pub location: String,
}

impl Default for ShiftPolicy {
    fn default() -> Self {
        Self {
            hours_per_shift: 7.5,
            efficiency: 0.85,
            start_time: "6:00 AM".into(),
            end_time: "2:30 PM".into(),
            lunch_duration: "30 Mins".into(),
            location: "Buena Park, CA".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ProductivityFile {
    metrics: ForecastMetrics,
    cases_per_pallet: f64,
    #[serde(default = "default_replenishment_ratio")]
    replenishment_ratio: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct RoleTaxonomyFile {
    roles: BTreeMap<String, Vec<String>>,
}

fn default_replenishment_ratio() -> f64 {
    0.1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub metrics: ForecastMetrics,
    pub shift: ShiftPolicy,
    pub cases_per_pallet: f64,
    /// Replenishment staff as a share of all other headcount.
    pub replenishment_ratio: f64,
    pub roles: RoleTaxonomy,
}

impl PlannerConfig {
    /// Load every config file under `data_dir`. Read once at startup.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let metrics_path = format!("{data_dir}/metrics/productivity.json");
        let metrics_content = std::fs::read_to_string(&metrics_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {metrics_path}: {e}"))?;
        let productivity: ProductivityFile = serde_json::from_str(&metrics_content)?;

        let roles_path = format!("{data_dir}/roles/role_taxonomy.json");
        let roles_content = std::fs::read_to_string(&roles_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {roles_path}: {e}"))?;
        let roles_file: RoleTaxonomyFile = serde_json::from_str(&roles_content)?;

        let shift_path = format!("{data_dir}/shift/shift_policy.json");
        let shift_content = std::fs::read_to_string(&shift_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {shift_path}: {e}"))?;
        let shift: ShiftPolicy = serde_json::from_str(&shift_content)?;

        let config = Self {
            metrics: productivity.metrics,
            shift,
            cases_per_pallet: productivity.cases_per_pallet,
            replenishment_ratio: productivity.replenishment_ratio,
            roles: RoleTaxonomy::new(roles_file.roles),
        };
        config.validate()?;

        log::info!(
            "config: loaded {} roles, shift {}h @ {:.0}% efficiency, {} cases/pallet",
            config.roles.len(),
            config.shift.hours_per_shift,
            config.shift.efficiency * 100.0,
            config.cases_per_pallet
        );
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.metrics.validate()?;
        if !(self.shift.hours_per_shift.is_finite() && self.shift.hours_per_shift > 0.0) {
            anyhow::bail!("hours_per_shift must be positive, got {}", self.shift.hours_per_shift);
        }
        if !(self.shift.efficiency.is_finite() && self.shift.efficiency > 0.0) {
            anyhow::bail!("efficiency must be positive, got {}", self.shift.efficiency);
        }
        if !(self.cases_per_pallet.is_finite() && self.cases_per_pallet > 0.0) {
            anyhow::bail!("cases_per_pallet must be positive, got {}", self.cases_per_pallet);
        }
        if !(self.replenishment_ratio.is_finite() && self.replenishment_ratio >= 0.0) {
            anyhow::bail!(
                "replenishment_ratio must be non-negative, got {}",
                self.replenishment_ratio
            );
        }
        Ok(())
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            metrics: ForecastMetrics::standard(),
            shift: ShiftPolicy::default(),
            cases_per_pallet: 75.0,
            replenishment_ratio: 0.1,
            roles: RoleTaxonomy::default(),
        }
    }
}
