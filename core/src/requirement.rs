//! The canonical requirement shape (operation → role → headcount) and
//! its flattened per-role view.

use crate::{
    taxonomy::normalize_role,
    types::{Headcount, RoleName},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const FORKLIFT_DRIVER: &str = "forklift_driver";
pub const RECEIVER: &str = "receiver";
pub const BENDI_DRIVER: &str = "bendi_driver";
pub const GENERAL_LABOR: &str = "general_labor";
pub const STAFF: &str = "staff";
/// Canonical role that replenishment staff is drawn from.
pub const CONSOLIDATION: &str = "consolidation";

/// Warehouse workflow stage. Ordering is the workflow order and drives
/// the order in which roles are flattened and allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Inbound,
    Picking,
    Loading,
    Replenishment,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound       => "inbound",
            Self::Picking       => "picking",
            Self::Loading       => "loading",
            Self::Replenishment => "replenishment",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The allocation unit for a role as it appears under `operation`.
pub fn canonical_role(operation: Operation, role: &str) -> RoleName {
    let role = normalize_role(role);
    if operation == Operation::Replenishment && role == STAFF {
        CONSOLIDATION.to_string()
    } else {
        role
    }
}

/// Required headcount per role per operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleRequirement {
    operations: BTreeMap<Operation, BTreeMap<RoleName, Headcount>>,
}

impl RoleRequirement {
    pub fn new() -> Self {
        Self::default()
    }

    /// The minimal safe requirement: one replenishment worker.
    pub fn fallback() -> Self {
        let mut req = Self::new();
        req.set(Operation::Replenishment, STAFF, 1);
        req
    }

    pub fn set(&mut self, operation: Operation, role: &str, count: Headcount) {
        self.operations
            .entry(operation)
            .or_default()
            .insert(role.to_string(), count);
    }

    /// Headcount for `role` under `operation`; 0 when absent.
    pub fn get(&self, operation: Operation, role: &str) -> Headcount {
        self.operations
            .get(&operation)
            .and_then(|roles| roles.get(role))
            .copied()
            .unwrap_or(0)
    }

    pub fn roles(&self, operation: Operation) -> Option<&BTreeMap<RoleName, Headcount>> {
        self.operations.get(&operation)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Operation, &str, Headcount)> {
        self.operations.iter().flat_map(|(op, roles)| {
            roles.iter().map(move |(role, count)| (*op, role.as_str(), *count))
        })
    }

    pub fn total(&self) -> Headcount {
        self.iter().map(|(_, _, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.values().all(|roles| roles.is_empty())
    }

    /// Merge counts of the same canonical role across operations.
    /// Roles keep the order of their first appearance.
    pub fn flatten(&self) -> FlatRequirement {
        let mut flat = FlatRequirement::default();
        for (operation, role, count) in self.iter() {
            flat.add(&canonical_role(operation, role), count);
        }
        flat
    }
}

/// Headcount per canonical role, in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatRequirement {
    roles: Vec<(RoleName, Headcount)>,
}

impl FlatRequirement {
    pub fn add(&mut self, role: &str, count: Headcount) {
        match self.roles.iter_mut().find(|(r, _)| r == role) {
            Some((_, existing)) => *existing += count,
            None => self.roles.push((role.to_string(), count)),
        }
    }

    pub fn get(&self, role: &str) -> Headcount {
        self.roles
            .iter()
            .find(|(r, _)| r == role)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Headcount)> {
        self.roles.iter().map(|(r, c)| (r.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn total(&self) -> Headcount {
        self.roles.iter().map(|(_, c)| c).sum()
    }
}

impl FromIterator<(RoleName, Headcount)> for FlatRequirement {
    fn from_iter<T: IntoIterator<Item = (RoleName, Headcount)>>(iter: T) -> Self {
        let mut flat = Self::default();
        for (role, count) in iter {
            flat.add(&role, count);
        }
        flat
    }
}
