//! Employee directory collaborator.
//!
//! The directory owns employee records; the planner only reads them.
//! It is passed in as a `&dyn EmployeeDirectory` so tests can swap the
//! SQLite store for an in-memory fixture.

use crate::{
    error::PlanResult,
    types::EmployeeId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    /// Job title as entered by HR.
    #[serde(default)]
    pub original_job_title: String,
    #[serde(default)]
    pub normalized_job_title: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub on_leave: bool,
    /// Free-text shift preference, e.g. "day", "night", "day,swing".
    #[serde(default)]
    pub shift_preferences: Option<String>,
    #[serde(default)]
    pub name_variants: Vec<String>,
}

fn default_active() -> bool {
    true
}

impl EmployeeRecord {
    pub fn new(id: &str, job_title: &str) -> Self {
        Self {
            id: id.to_string(),
            original_job_title: job_title.to_string(),
            normalized_job_title: job_title.trim().to_lowercase(),
            active: true,
            on_leave: false,
            shift_preferences: None,
            name_variants: Vec::new(),
        }
    }

    pub fn with_name_variants(mut self, variants: &[&str]) -> Self {
        self.name_variants = variants.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn with_shift(mut self, preference: &str) -> Self {
        self.shift_preferences = Some(preference.to_string());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn on_leave(mut self) -> Self {
        self.on_leave = true;
        self
    }
}

/// Eligible for a day-shift assignment: active, not on leave, and no
/// shift preference or one that includes "day".
pub fn is_available(record: &EmployeeRecord) -> bool {
    if !record.active || record.on_leave {
        return false;
    }
    match record.shift_preferences.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(pref) => pref.to_lowercase().contains("day"),
    }
}

/// Read access to employee records.
pub trait EmployeeDirectory {
    /// Point-in-time snapshot of every record, in a stable order.
    fn list_employees(&self) -> PlanResult<Vec<EmployeeRecord>>;

    fn get_employee(&self, id: &str) -> PlanResult<Option<EmployeeRecord>>;
}

/// Directory held entirely in memory, ordered by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    records: BTreeMap<EmployeeId, EmployeeRecord>,
}

impl InMemoryDirectory {
    pub fn new(records: impl IntoIterator<Item = EmployeeRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }

    pub fn insert(&mut self, record: EmployeeRecord) {
        self.records.insert(record.id.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl EmployeeDirectory for InMemoryDirectory {
    fn list_employees(&self) -> PlanResult<Vec<EmployeeRecord>> {
        Ok(self.records.values().cloned().collect())
    }

    fn get_employee(&self, id: &str) -> PlanResult<Option<EmployeeRecord>> {
        Ok(self.records.get(id).cloned())
    }
}
