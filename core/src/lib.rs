//! Warehouse staffing planner.
//!
//! Turns shipping/receiving forecasts into per-role headcount, matches
//! directory employees to those roles and books them without
//! double-booking. Collaborators (forecasts, directory, notification)
//! are traits so the planner runs the same against SQLite, fixtures or
//! remote services.

pub mod allocator;
pub mod config;
pub mod demand;
pub mod directory;
pub mod error;
pub mod event;
pub mod forecast;
pub mod fuzzy;
pub mod horizon;
pub mod matching;
pub mod notify;
pub mod planner;
pub mod requirement;
pub mod store;
pub mod taxonomy;
pub mod types;
