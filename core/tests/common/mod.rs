//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use staffing_core::{
    allocator::{AssignmentResult, Shortage},
    directory::{EmployeeDirectory, EmployeeRecord, InMemoryDirectory},
    error::{PlanError, PlanResult},
    forecast::{ForecastSource, OutboundOrder, PickedOrder},
    notify::Notifier,
    planner::{DaySchedule, DaySummary},
    requirement::RoleRequirement,
};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid test date")
}

// ── Forecasts ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct DayData {
    pub outbound: Vec<OutboundOrder>,
    pub picked: Vec<PickedOrder>,
    pub incoming: f64,
}

impl DayData {
    /// One case-pick order of `cases`, `staged` picked pallets.
    pub fn simple(incoming: f64, cases: f64, staged: f64) -> Self {
        Self {
            outbound: vec![OutboundOrder {
                order_id: "DN-1".into(),
                pallet_qty: 0.0,
                order_qty: cases,
                picking_type: "CASE_PICK".into(),
            }],
            picked: vec![PickedOrder { pallet_qty: staged }],
            incoming,
        }
    }
}

/// Forecasts keyed by date; dates in `failing` (or absent) error out.
#[derive(Debug, Default)]
pub struct StaticForecasts {
    pub days: BTreeMap<NaiveDate, DayData>,
    pub failing: BTreeSet<NaiveDate>,
}

impl StaticForecasts {
    pub fn with_day(mut self, date: NaiveDate, data: DayData) -> Self {
        self.days.insert(date, data);
        self
    }

    pub fn failing_on(mut self, date: NaiveDate) -> Self {
        self.failing.insert(date);
        self
    }

    fn day(&self, date: NaiveDate) -> PlanResult<&DayData> {
        if self.failing.contains(&date) {
            return Err(PlanError::CollaboratorUnavailable {
                source_name: "order_api".into(),
                reason: format!("HTTP 503 for {date}"),
            });
        }
        self.days.get(&date).ok_or_else(|| PlanError::CollaboratorUnavailable {
            source_name: "order_api".into(),
            reason: format!("no data for {date}"),
        })
    }
}

impl ForecastSource for StaticForecasts {
    fn get_outbound_orders(&self, date: NaiveDate) -> PlanResult<Vec<OutboundOrder>> {
        Ok(self.day(date)?.outbound.clone())
    }

    fn get_picked_outbound_orders(&self, date: NaiveDate) -> PlanResult<Vec<PickedOrder>> {
        Ok(self.day(date)?.picked.clone())
    }

    fn get_incoming_pallets(&self, date: NaiveDate) -> PlanResult<f64> {
        Ok(self.day(date)?.incoming)
    }
}

// ── Directory ─────────────────────────────────────────────────────

/// A small warehouse crew covering every role the demand engine emits.
pub fn crew() -> InMemoryDirectory {
    InMemoryDirectory::new([
        EmployeeRecord::new("E001", "Level 2 Forklift Driver").with_name_variants(&["John Smith", "Johnny Smith"]),
        EmployeeRecord::new("E002", "Forklift Operator").with_name_variants(&["Maria Lopez"]),
        EmployeeRecord::new("E003", "Reach Truck").with_name_variants(&["Kwame Mensah"]),
        EmployeeRecord::new("E004", "Bendi Operator").with_name_variants(&["Alex Chen"]),
        EmployeeRecord::new("E005", "Receiving Clerk").with_name_variants(&["Priya Patel"]),
        EmployeeRecord::new("E006", "General Labor").with_name_variants(&["Sam Okafor"]),
        EmployeeRecord::new("E007", "Warehouse Worker").with_name_variants(&["Lena Fischer"]),
        EmployeeRecord::new("E008", "Inventory Control").with_name_variants(&["Diego Ramos"]),
    ])
}

/// Directory whose every call fails.
pub struct BrokenDirectory;

impl EmployeeDirectory for BrokenDirectory {
    fn list_employees(&self) -> PlanResult<Vec<EmployeeRecord>> {
        Err(PlanError::CollaboratorUnavailable {
            source_name: "hr_db".into(),
            reason: "connection refused".into(),
        })
    }

    fn get_employee(&self, _id: &str) -> PlanResult<Option<EmployeeRecord>> {
        self.list_employees().map(|_| None)
    }
}

// ── Notifier ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Schedule { date: NaiveDate, assigned: usize },
    Combined { day1: NaiveDate, day2: NaiveDate, shortages: Shortage },
}

/// Records every call; optionally fails them all.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<Sent>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self { sent: RefCell::default(), fail: true }
    }

    fn outcome(&self) -> PlanResult<()> {
        if self.fail {
            return Err(PlanError::CollaboratorUnavailable {
                source_name: "mailer".into(),
                reason: "SMTP timeout".into(),
            });
        }
        Ok(())
    }
}

impl Notifier for RecordingNotifier {
    fn send_schedule(&self, day: &DaySchedule, assignment: &AssignmentResult) -> PlanResult<()> {
        self.sent.borrow_mut().push(Sent::Schedule {
            date: day.date(),
            assigned: assignment.values().map(Vec::len).sum(),
        });
        self.outcome()
    }

    fn send_combined_forecast(
        &self,
        day1: &DaySummary,
        day2: &DaySummary,
        _requirements1: &RoleRequirement,
        _requirements2: &RoleRequirement,
        shortages: &Shortage,
    ) -> PlanResult<()> {
        self.sent.borrow_mut().push(Sent::Combined {
            day1: day1.day.date,
            day2: day2.day.date,
            shortages: shortages.clone(),
        });
        self.outcome()
    }
}
