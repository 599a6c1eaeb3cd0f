//! Notification collaborator contract and a logging implementation.
//!
//! Delivery (email, chat, ...) lives outside the core. The planner calls
//! each method once per run and records failures without retrying.

use crate::{
    allocator::{AssignmentResult, Shortage},
    error::PlanResult,
    planner::{DaySchedule, DaySummary},
    requirement::RoleRequirement,
};
use std::fmt::Write as _;

pub trait Notifier {
    /// Publish one day's schedule.
    fn send_schedule(&self, day: &DaySchedule, assignment: &AssignmentResult) -> PlanResult<()>;

    /// Publish the two-day forecast with tomorrow's shortages.
    fn send_combined_forecast(
        &self,
        day1: &DaySummary,
        day2: &DaySummary,
        requirements1: &RoleRequirement,
        requirements2: &RoleRequirement,
        shortages: &Shortage,
    ) -> PlanResult<()>;
}

/// Writes rendered notifications to the log at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send_schedule(&self, day: &DaySchedule, assignment: &AssignmentResult) -> PlanResult<()> {
        log::info!("notify: schedule\n{}", render_schedule(day, assignment));
        Ok(())
    }

    fn send_combined_forecast(
        &self,
        day1: &DaySummary,
        day2: &DaySummary,
        requirements1: &RoleRequirement,
        requirements2: &RoleRequirement,
        shortages: &Shortage,
    ) -> PlanResult<()> {
        log::info!(
            "notify: combined forecast\n{}",
            render_combined_forecast(day1, day2, requirements1, requirements2, shortages)
        );
        Ok(())
    }
}

/// Plain-text schedule for one day.
pub fn render_schedule(day: &DaySchedule, assignment: &AssignmentResult) -> String {
    let mut out = String::new();
    let summary = &day.summary;
    let _ = writeln!(out, "Schedule for {} ({})", summary.day.day_name, summary.day.iso_date());
    let _ = writeln!(
        out,
        "Shift: {} - {} (lunch {}) at {}",
        day.shift.start_time, day.shift.end_time, day.shift.lunch_duration, day.shift.location
    );
    for (role, ids) in assignment {
        let required = day.flat_requirements.get(role);
        let names = if ids.is_empty() { "-".to_string() } else { ids.join(", ") };
        let _ = writeln!(out, "  {role} ({}/{required}): {names}", ids.len());
    }
    out
}

/// Plain-text two-day forecast and staffing summary.
pub fn render_combined_forecast(
    day1: &DaySummary,
    day2: &DaySummary,
    requirements1: &RoleRequirement,
    requirements2: &RoleRequirement,
    shortages: &Shortage,
) -> String {
    let mut out = String::new();
    for (summary, requirements) in [(day1, requirements1), (day2, requirements2)] {
        let f = &summary.forecast;
        let _ = writeln!(out, "{} ({})", summary.day.day_name, summary.day.iso_date());
        let _ = writeln!(
            out,
            "  incoming pallets: {}  shipping pallets: {}  cases to pick: {}  staged pallets: {}",
            f.incoming_pallets, f.shipping_pallets, f.cases_to_pick, f.staged_pallets
        );
        for (operation, role, count) in requirements.iter() {
            let _ = writeln!(out, "  {operation}.{role}: {count}");
        }
    }
    if shortages.is_empty() {
        let _ = writeln!(out, "No shortages for {}", day1.day.iso_date());
    } else {
        let _ = writeln!(out, "Shortages for {}:", day1.day.iso_date());
        for (role, gap) in shortages {
            let _ = writeln!(out, "  {role}: {gap}");
        }
    }
    out
}
