use super::PlanStore;
use crate::{
    directory::{EmployeeDirectory, EmployeeRecord},
    error::{PlanError, PlanResult},
};
use rusqlite::{params, OptionalExtension, Row};

/// Row as stored; `name_variants` is still raw JSON.
struct EmployeeRow {
    record: EmployeeRecord,
    name_variants_json: String,
}

impl EmployeeRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            record: EmployeeRecord {
                id:                   row.get(0)?,
                original_job_title:   row.get(1)?,
                normalized_job_title: row.get(2)?,
                active:               row.get::<_, i32>(3)? != 0,
                on_leave:             row.get::<_, i32>(4)? != 0,
                shift_preferences:    row.get(5)?,
                name_variants:        Vec::new(),
            },
            name_variants_json: row.get(6)?,
        })
    }

    fn decode(self) -> PlanResult<EmployeeRecord> {
        let variants: Vec<String> = serde_json::from_str(&self.name_variants_json).map_err(|e| {
            PlanError::MalformedEmployee {
                id: self.record.id.clone(),
                reason: format!("name_variants: {e}"),
            }
        })?;
        Ok(EmployeeRecord {
            name_variants: variants,
            ..self.record
        })
    }
}

const SELECT_EMPLOYEE: &str =
    "SELECT employee_id, original_job_title, normalized_job_title, active, on_leave,
            shift_preferences, name_variants
     FROM employee";

impl PlanStore {
    // ── Employee ──────────────────────────────────────────────────

    pub fn upsert_employee(&self, record: &EmployeeRecord) -> PlanResult<()> {
        self.conn.execute(
            "INSERT INTO employee (employee_id, original_job_title, normalized_job_title,
                                   active, on_leave, shift_preferences, name_variants)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(employee_id) DO UPDATE SET
                original_job_title   = excluded.original_job_title,
                normalized_job_title = excluded.normalized_job_title,
                active               = excluded.active,
                on_leave             = excluded.on_leave,
                shift_preferences    = excluded.shift_preferences,
                name_variants        = excluded.name_variants",
            params![
                record.id,
                record.original_job_title,
                record.normalized_job_title,
                record.active as i32,
                record.on_leave as i32,
                record.shift_preferences,
                serde_json::to_string(&record.name_variants)?,
            ],
        )?;
        Ok(())
    }

    /// Store name variants as raw text, bypassing encoding.
    /// Lets imports keep whatever the upstream system sent.
    pub fn set_raw_name_variants(&self, employee_id: &str, raw: &str) -> PlanResult<()> {
        let changed = self.conn.execute(
            "UPDATE employee SET name_variants = ?2 WHERE employee_id = ?1",
            params![employee_id, raw],
        )?;
        if changed == 0 {
            return Err(PlanError::EmployeeNotFound { id: employee_id.to_string() });
        }
        Ok(())
    }

    pub fn employee_count(&self) -> PlanResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM employee", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Full record for one employee, or an error when it is absent.
    pub fn employee_details(&self, employee_id: &str) -> PlanResult<EmployeeRecord> {
        self.get_employee(employee_id)?
            .ok_or_else(|| PlanError::EmployeeNotFound { id: employee_id.to_string() })
    }
}

impl EmployeeDirectory for PlanStore {
    /// Records ordered by id. A record with undecodable name variants is
    /// still listed, without variants; matching never reads them.
    fn list_employees(&self) -> PlanResult<Vec<EmployeeRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_EMPLOYEE} ORDER BY employee_id ASC"))?;
        let rows = stmt
            .query_map([], EmployeeRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let fallback = row.record.clone();
                row.decode().unwrap_or_else(|e| {
                    log::warn!("store: {e}");
                    fallback
                })
            })
            .collect())
    }

    fn get_employee(&self, id: &str) -> PlanResult<Option<EmployeeRecord>> {
        let row = self
            .conn
            .query_row(
                &format!("{SELECT_EMPLOYEE} WHERE employee_id = ?1"),
                params![id],
                EmployeeRow::from_row,
            )
            .optional()?;
        row.map(EmployeeRow::decode).transpose()
    }
}
