//! Shared primitive types used across the planner.

/// A stable, unique employee identifier owned by the directory.
pub type EmployeeId = String;

/// A canonical role name (`forklift_driver`, `receiver`, ...).
pub type RoleName = String;

/// A required or assigned headcount.
pub type Headcount = u32;

/// The canonical planning-run identifier.
pub type RunId = String;
