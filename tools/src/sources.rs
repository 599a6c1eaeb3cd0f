//! File-backed collaborators for headless runs.

use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use staffing_core::{
    directory::EmployeeRecord,
    error::{PlanError, PlanResult},
    forecast::{ForecastSource, OutboundOrder, PickedOrder},
    store::PlanStore,
};
use std::path::{Path, PathBuf};

/// One forecast file per date: `<dir>/<YYYY-MM-DD>.json`.
#[derive(Debug, Deserialize)]
struct ForecastFile {
    #[serde(default)]
    outbound_orders: Vec<OutboundOrder>,
    #[serde(default)]
    picked_orders: Vec<PickedOrder>,
    #[serde(default)]
    incoming_pallets: f64,
}

pub struct FileForecastSource {
    dir: PathBuf,
}

impl FileForecastSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn load(&self, date: NaiveDate) -> PlanResult<ForecastFile> {
        let path = self.dir.join(format!("{}.json", date.format("%Y-%m-%d")));
        let content = std::fs::read_to_string(&path).map_err(|e| PlanError::CollaboratorUnavailable {
            source_name: "forecast_file".into(),
            reason: format!("{}: {e}", path.display()),
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl ForecastSource for FileForecastSource {
    fn get_outbound_orders(&self, date: NaiveDate) -> PlanResult<Vec<OutboundOrder>> {
        Ok(self.load(date)?.outbound_orders)
    }

    fn get_picked_outbound_orders(&self, date: NaiveDate) -> PlanResult<Vec<PickedOrder>> {
        Ok(self.load(date)?.picked_orders)
    }

    fn get_incoming_pallets(&self, date: NaiveDate) -> PlanResult<f64> {
        Ok(self.load(date)?.incoming_pallets)
    }
}

/// Upsert every record of a JSON employee export into the store.
pub fn import_employees(store: &PlanStore, path: &Path) -> anyhow::Result<usize> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let records: Vec<EmployeeRecord> = serde_json::from_str(&content)?;
    for record in &records {
        store.upsert_employee(record)?;
    }
    log::info!("import: {} employees from {}", records.len(), path.display());
    Ok(records.len())
}
