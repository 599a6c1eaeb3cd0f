//! The plan event log: one entry per stage of a planning run.
//!
//! RULE: every degradation (fallback, shortage, skipped collaborator)
//! is recorded here as well as logged, so a persisted run explains
//! itself without the process logs.

use crate::{
    requirement::RoleRequirement,
    types::{EmployeeId, Headcount, RoleName, RunId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanEvent {
    // ── Run lifecycle ──────────────────────────────
    RunStarted {
        run_id: RunId,
        base_date: NaiveDate,
    },
    RunAborted {
        run_id: RunId,
        reason: String,
    },
    RunCompleted {
        run_id: RunId,
        assigned_tomorrow: usize,
        assigned_day_after: usize,
        shortage_roles: usize,
    },

    // ── Forecast stage ─────────────────────────────
    ForecastCollected {
        date: NaiveDate,
        incoming_pallets: f64,
        shipping_pallets: f64,
        order_qty: f64,
        staged_pallets: f64,
    },
    ForecastUnavailable {
        date: NaiveDate,
        reason: String,
    },

    // ── Planning stage ─────────────────────────────
    RequirementsComputed {
        date: NaiveDate,
        requirements: RoleRequirement,
        total_headcount: Headcount,
    },
    RequirementFallback {
        date: NaiveDate,
        reason: String,
    },
    EmployeesAssigned {
        date: NaiveDate,
        role: RoleName,
        employee_ids: Vec<EmployeeId>,
    },
    ShortageRecorded {
        date: NaiveDate,
        role: RoleName,
        shortfall: Headcount,
    },
    OverrideApplied {
        date: NaiveDate,
        role: RoleName,
        query: String,
        employee_id: Option<EmployeeId>,
    },

    // ── Notification ───────────────────────────────
    NotificationFailed {
        channel: String,
        reason: String,
    },
}

impl PlanEvent {
    /// Stable name used for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RunStarted { .. }           => "run_started",
            Self::RunAborted { .. }           => "run_aborted",
            Self::RunCompleted { .. }         => "run_completed",
            Self::ForecastCollected { .. }    => "forecast_collected",
            Self::ForecastUnavailable { .. }  => "forecast_unavailable",
            Self::RequirementsComputed { .. } => "requirements_computed",
            Self::RequirementFallback { .. }  => "requirement_fallback",
            Self::EmployeesAssigned { .. }    => "employees_assigned",
            Self::ShortageRecorded { .. }     => "shortage_recorded",
            Self::OverrideApplied { .. }      => "override_applied",
            Self::NotificationFailed { .. }   => "notification_failed",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub run_id: RunId,
    pub seq: u32,
    pub event_type: String,
    pub payload: String, // JSON-serialized PlanEvent
}
