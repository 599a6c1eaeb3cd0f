//! Planning horizon: the two days a run plans for.

use crate::error::PlanResult;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningDay {
    pub date: NaiveDate,
    /// Weekday name, e.g. "Tuesday".
    pub day_name: String,
}

impl PlanningDay {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            day_name: date.format("%A").to_string(),
        }
    }

    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Tomorrow is staffed; the day after is informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningHorizon {
    pub base: NaiveDate,
    pub tomorrow: PlanningDay,
    pub day_after: PlanningDay,
}

impl PlanningHorizon {
    pub fn from_base(base: NaiveDate) -> PlanResult<Self> {
        let offset = |n: u64| {
            base.checked_add_days(Days::new(n))
                .ok_or_else(|| anyhow::anyhow!("date {base} + {n} days is out of range"))
        };
        Ok(Self {
            base,
            tomorrow: PlanningDay::new(offset(1)?),
            day_after: PlanningDay::new(offset(2)?),
        })
    }
}
