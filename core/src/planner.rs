//! The planning run: forecast, demand, matching, allocation, notify.
//!
//! STAGES (fixed order, per run):
//!   1. Forecast: both horizon days are fetched before anything else.
//!      If either day is unavailable the run yields nothing.
//!   2. Planning: requirements, candidate pools and allocation are
//!      computed for each day independently, each against its own
//!      directory snapshot.
//!   3. Shortages: reported for tomorrow only.
//!   4. Notify: one schedule per day plus a combined summary.
//!      Notification failures are recorded, never retried.
//!
//! RULES:
//!   - No randomness. Same forecasts + same directory = same output.
//!   - Nothing in a run panics or propagates; the worst case is `None`
//!     or a minimal schedule, with the reason in the event log.

use crate::{
    allocator::{assign_employees, Allocation, AssignmentResult, Shortage},
    config::{PlannerConfig, ShiftPolicy},
    demand::{compute_requirements_or_fallback, DemandPolicy},
    directory::EmployeeDirectory,
    event::PlanEvent,
    forecast::{gather_forecast, ForecastDay, ForecastSource},
    fuzzy::resolve_name,
    horizon::{PlanningDay, PlanningHorizon},
    notify::Notifier,
    requirement::{FlatRequirement, RoleRequirement},
    taxonomy::normalize_role,
    types::{EmployeeId, RunId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date, weekday and forecast volumes for one planning day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub day: PlanningDay,
    pub forecast: ForecastDay,
}

/// Everything planned for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub summary: DaySummary,
    pub shift: ShiftPolicy,
    pub requirements: RoleRequirement,
    pub flat_requirements: FlatRequirement,
    pub allocation: Allocation,
}

impl DaySchedule {
    pub fn date(&self) -> NaiveDate {
        self.summary.day.date
    }

    pub fn assignments(&self) -> &AssignmentResult {
        &self.allocation.assignments
    }
}

/// The result of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRun {
    pub run_id: RunId,
    pub tomorrow: DaySchedule,
    pub day_after: DaySchedule,
    /// Tomorrow's shortages; the day after is informational.
    pub shortages: Shortage,
}

/// Outcome of a manual name override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideOutcome {
    Assigned { employee_id: EmployeeId, role: String },
    AlreadyAssigned { employee_id: EmployeeId, role: String },
    NoMatch,
}

pub struct Planner<'a> {
    pub run_id: RunId,
    config: &'a PlannerConfig,
    forecasts: &'a dyn ForecastSource,
    directory: &'a dyn EmployeeDirectory,
    notifier: &'a dyn Notifier,
    events: Vec<PlanEvent>,
}

impl<'a> Planner<'a> {
    pub fn new(
        run_id: RunId,
        config: &'a PlannerConfig,
        forecasts: &'a dyn ForecastSource,
        directory: &'a dyn EmployeeDirectory,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            run_id,
            config,
            forecasts,
            directory,
            notifier,
            events: Vec::new(),
        }
    }

    /// Events recorded so far, in order.
    pub fn events(&self) -> &[PlanEvent] {
        &self.events
    }

    /// Plan tomorrow and the day after `base`.
    pub fn run(&mut self, base: NaiveDate) -> Option<ScheduleRun> {
        self.events.push(PlanEvent::RunStarted {
            run_id: self.run_id.clone(),
            base_date: base,
        });

        let horizon = match PlanningHorizon::from_base(base) {
            Ok(h) => h,
            Err(e) => return self.abort(format!("no planning horizon: {e}")),
        };

        // Both days are fetched before either is checked.
        let forecast_tomorrow = self.collect_forecast(&horizon.tomorrow);
        let forecast_day_after = self.collect_forecast(&horizon.day_after);
        let (forecast_tomorrow, forecast_day_after) = match (forecast_tomorrow, forecast_day_after) {
            (Some(a), Some(b)) => (a, b),
            _ => return self.abort("forecast unavailable for at least one day".into()),
        };

        let tomorrow = self.plan_day(&horizon.tomorrow, forecast_tomorrow);
        let day_after = self.plan_day(&horizon.day_after, forecast_day_after);

        let shortages = tomorrow.allocation.shortages.clone();
        for (role, shortfall) in &shortages {
            self.events.push(PlanEvent::ShortageRecorded {
                date: tomorrow.date(),
                role: role.clone(),
                shortfall: *shortfall,
            });
        }

        let run = ScheduleRun {
            run_id: self.run_id.clone(),
            tomorrow,
            day_after,
            shortages,
        };
        self.notify(&run);

        self.events.push(PlanEvent::RunCompleted {
            run_id: self.run_id.clone(),
            assigned_tomorrow: run.tomorrow.allocation.total_assigned(),
            assigned_day_after: run.day_after.allocation.total_assigned(),
            shortage_roles: run.shortages.len(),
        });
        log::info!(
            "run={} completed: tomorrow {} assigned, day-after {} assigned, {} roles short",
            self.run_id,
            run.tomorrow.allocation.total_assigned(),
            run.day_after.allocation.total_assigned(),
            run.shortages.len()
        );
        Some(run)
    }

    /// Forecast stage for one day. `None` when any collaborator fails.
    pub fn collect_forecast(&mut self, day: &PlanningDay) -> Option<ForecastDay> {
        match gather_forecast(self.forecasts, day.date) {
            Ok(forecast) => {
                self.events.push(PlanEvent::ForecastCollected {
                    date: day.date,
                    incoming_pallets: forecast.incoming_pallets,
                    shipping_pallets: forecast.shipping_pallets,
                    order_qty: forecast.order_qty,
                    staged_pallets: forecast.staged_pallets,
                });
                Some(forecast)
            }
            Err(e) => {
                log::warn!("date={} forecast: unavailable: {e}", day.date);
                self.events.push(PlanEvent::ForecastUnavailable {
                    date: day.date,
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    /// Planning stage for one day.
    pub fn plan_day(&mut self, day: &PlanningDay, forecast: ForecastDay) -> DaySchedule {
        let policy = DemandPolicy::from_config(self.config);
        let (requirements, fallback) =
            compute_requirements_or_fallback(&self.config.metrics, &forecast, &policy);
        if let Some(e) = fallback {
            log::warn!("date={} demand: fallback requirement: {e}", day.date);
            self.events.push(PlanEvent::RequirementFallback {
                date: day.date,
                reason: e.to_string(),
            });
        }
        self.events.push(PlanEvent::RequirementsComputed {
            date: day.date,
            requirements: requirements.clone(),
            total_headcount: requirements.total(),
        });

        let allocation = assign_employees(&requirements, self.directory, &self.config.roles);
        for (role, ids) in &allocation.assignments {
            self.events.push(PlanEvent::EmployeesAssigned {
                date: day.date,
                role: role.clone(),
                employee_ids: ids.clone(),
            });
        }
        log::info!(
            "date={} plan: {} required, {} assigned",
            day.date,
            requirements.total(),
            allocation.total_assigned()
        );

        DaySchedule {
            summary: DaySummary {
                day: day.clone(),
                forecast,
            },
            shift: self.config.shift.clone(),
            flat_requirements: requirements.flatten(),
            requirements,
            allocation,
        }
    }

    /// Resolve a free-text `name` among `candidates` and book the match
    /// for `role` on tomorrow's schedule, unless already booked that day.
    /// The run's shortage report follows tomorrow's allocation.
    pub fn apply_override(
        &mut self,
        run: &mut ScheduleRun,
        role: &str,
        name: &str,
        candidates: &[EmployeeId],
    ) -> OverrideOutcome {
        let schedule = &mut run.tomorrow;
        let role = normalize_role(role);
        let resolved = resolve_name(name, candidates, self.directory);
        self.events.push(PlanEvent::OverrideApplied {
            date: schedule.date(),
            role: role.clone(),
            query: name.to_string(),
            employee_id: resolved.clone(),
        });

        let Some(employee_id) = resolved else {
            log::info!("date={} override: no match for '{name}'", schedule.date());
            return OverrideOutcome::NoMatch;
        };

        if let Some(existing) = schedule.allocation.role_of(&employee_id) {
            return OverrideOutcome::AlreadyAssigned {
                employee_id,
                role: existing.to_string(),
            };
        }

        schedule
            .allocation
            .assignments
            .entry(role.clone())
            .or_default()
            .push(employee_id.clone());
        if let Some(gap) = schedule.allocation.shortages.get_mut(&role) {
            *gap -= 1;
            if *gap == 0 {
                schedule.allocation.shortages.remove(&role);
            }
        }
        log::info!("date={} override: '{name}' -> {employee_id} as {role}", schedule.date());
        run.shortages = run.tomorrow.allocation.shortages.clone();
        OverrideOutcome::Assigned { employee_id, role }
    }

    fn notify(&mut self, run: &ScheduleRun) {
        for day in [&run.tomorrow, &run.day_after] {
            if let Err(e) = self.notifier.send_schedule(day, day.assignments()) {
                self.notification_failed("schedule", e.to_string());
            }
        }
        if let Err(e) = self.notifier.send_combined_forecast(
            &run.tomorrow.summary,
            &run.day_after.summary,
            &run.tomorrow.requirements,
            &run.day_after.requirements,
            &run.shortages,
        ) {
            self.notification_failed("combined_forecast", e.to_string());
        }
    }

    fn notification_failed(&mut self, channel: &str, reason: String) {
        log::warn!("run={} notify: {channel} failed: {reason}", self.run_id);
        self.events.push(PlanEvent::NotificationFailed {
            channel: channel.to_string(),
            reason,
        });
    }

    fn abort(&mut self, reason: String) -> Option<ScheduleRun> {
        log::warn!("run={} aborted: {reason}", self.run_id);
        self.events.push(PlanEvent::RunAborted {
            run_id: self.run_id.clone(),
            reason,
        });
        None
    }
}
