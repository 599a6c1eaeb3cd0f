//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The planner works on in-memory snapshots handed out by store methods.

use crate::{
    error::PlanResult,
    event::{EventLogEntry, PlanEvent},
    planner::ScheduleRun,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

mod employee;

pub struct PlanStore {
    conn: Connection,
}

impl PlanStore {
    pub fn open(path: &str) -> PlanResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> PlanResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> PlanResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_employees.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, base_date: NaiveDate, version: &str) -> PlanResult<()> {
        self.conn.execute(
            "INSERT INTO plan_run (run_id, base_date, version) VALUES (?1, ?2, ?3)",
            params![run_id, base_date.format("%Y-%m-%d").to_string(), version],
        )?;
        Ok(())
    }

    pub fn run_exists(&self, run_id: &str) -> PlanResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM plan_run WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, run_id: &str, seq: u32, event: &PlanEvent) -> PlanResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, seq, event_type, payload) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seq, event.type_name(), serde_json::to_string(event)?],
        )?;
        Ok(())
    }

    /// Persist a run's events in order, numbering them from 0.
    pub fn append_events(&self, run_id: &str, events: &[PlanEvent]) -> PlanResult<()> {
        for (seq, event) in events.iter().enumerate() {
            self.append_event(run_id, seq as u32, event)?;
        }
        log::debug!("store: {} events persisted for run {run_id}", events.len());
        Ok(())
    }

    pub fn events_for_run(&self, run_id: &str) -> PlanResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, seq, event_type, payload
             FROM event_log WHERE run_id = ?1
             ORDER BY seq ASC, id ASC",
        )?;
        let entries = stmt
            .query_map(params![run_id], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    run_id:     row.get(1)?,
                    seq:        row.get(2)?,
                    event_type: row.get(3)?,
                    payload:    row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    // ── Schedule snapshot ──────────────────────────────────────

    pub fn save_schedule(&self, run: &ScheduleRun) -> PlanResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO schedule_snapshot (run_id, tomorrow, schedule_json)
             VALUES (?1, ?2, ?3)",
            params![
                run.run_id,
                run.tomorrow.summary.day.iso_date(),
                serde_json::to_string(run)?
            ],
        )?;
        Ok(())
    }

    /// Most recent schedule whose tomorrow is on or before `date`.
    pub fn latest_schedule(&self, date: NaiveDate) -> PlanResult<Option<ScheduleRun>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT schedule_json FROM schedule_snapshot
                 WHERE tomorrow <= ?1
                 ORDER BY tomorrow DESC, rowid DESC LIMIT 1",
                params![date.format("%Y-%m-%d").to_string()],
                |row| row.get(0),
            )
            .optional()?;
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}
