//! Greedy, single-pass allocation of candidates to roles.
//!
//! Roles are filled in flattened requirement order; each role takes the
//! first free candidates of its pool in pool order. An employee booked
//! for one role is skipped by every later role.

use crate::{
    directory::EmployeeDirectory,
    matching::{match_employees, CandidatePools},
    requirement::{FlatRequirement, RoleRequirement},
    taxonomy::RoleTaxonomy,
    types::{EmployeeId, Headcount, RoleName},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Assigned employee ids per canonical role, in assignment order.
pub type AssignmentResult = BTreeMap<RoleName, Vec<EmployeeId>>;

/// Unfilled headcount per role; only roles with a positive gap appear.
pub type Shortage = BTreeMap<RoleName, Headcount>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub assignments: AssignmentResult,
    pub shortages: Shortage,
}

impl Allocation {
    pub fn assigned_count(&self, role: &str) -> Headcount {
        self.assignments
            .get(role)
            .map(|ids| ids.len() as Headcount)
            .unwrap_or(0)
    }

    pub fn total_assigned(&self) -> usize {
        self.assignments.values().map(Vec::len).sum()
    }

    /// The role an employee is booked for, if any.
    pub fn role_of(&self, id: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|(_, ids)| ids.iter().any(|assigned| assigned == id))
            .map(|(role, _)| role.as_str())
    }
}

/// Allocate a nested requirement; see [`allocate_flat`].
pub fn allocate(requirements: &RoleRequirement, pools: &CandidatePools) -> Allocation {
    allocate_flat(&requirements.flatten(), pools)
}

pub fn allocate_flat(requirements: &FlatRequirement, pools: &CandidatePools) -> Allocation {
    let mut booked: BTreeSet<&str> = BTreeSet::new();
    let mut assignments = AssignmentResult::new();

    for (role, required) in requirements.iter() {
        let pool = pools.get(role).map(Vec::as_slice).unwrap_or(&[]);
        let mut assigned: Vec<EmployeeId> = Vec::new();

        for candidate in pool {
            if assigned.len() as Headcount >= required {
                break;
            }
            if booked.insert(candidate.id.as_str()) {
                assigned.push(candidate.id.clone());
            }
        }
        log::debug!(
            "allocate: role={role} required={required} assigned={} pool={}",
            assigned.len(),
            pool.len()
        );
        assignments.entry(role.to_string()).or_default().extend(assigned);
    }

    let shortages = compute_shortages(requirements, &assignments);
    Allocation { assignments, shortages }
}

/// `required - assigned` for every role where assignment fell short.
pub fn compute_shortages(requirements: &FlatRequirement, assignments: &AssignmentResult) -> Shortage {
    let mut shortages = Shortage::new();
    for (role, required) in requirements.iter() {
        let filled = assignments.get(role).map(|ids| ids.len() as Headcount).unwrap_or(0);
        if filled < required {
            log::warn!("allocate: shortage role={role} required={required} assigned={filled}");
            shortages.insert(role.to_string(), required - filled);
        }
    }
    shortages
}

/// Match and allocate in one step. A directory failure degrades to an
/// empty assignment (every role short) instead of propagating.
pub fn assign_employees(
    requirements: &RoleRequirement,
    directory: &dyn EmployeeDirectory,
    taxonomy: &RoleTaxonomy,
) -> Allocation {
    let flat = requirements.flatten();
    match match_employees(&flat, directory, taxonomy) {
        Ok(pools) => allocate_flat(&flat, &pools),
        Err(e) => {
            log::warn!("allocate: matching failed, no employees assigned: {e}");
            let assignments = AssignmentResult::new();
            let shortages = compute_shortages(&flat, &assignments);
            Allocation { assignments, shortages }
        }
    }
}
