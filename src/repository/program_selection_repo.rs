// ==========================================
// Course Planner - program selection repository
// ==========================================
// One {majors, minors} document per schedule.
// Caps are enforced by ProgramSelection before saving, not here.
// ==========================================

use crate::domain::program::SelectedPrograms;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct ProgramSelectionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProgramSelectionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Empty selection when nothing was saved for the schedule
    pub fn load(&self, schedule_id: &str) -> RepositoryResult<SelectedPrograms> {
        let conn = self.get_conn()?;

        let raw: Option<String> = conn
            .query_row(
                "SELECT selection_json FROM program_selection WHERE schedule_id = ?",
                params![schedule_id],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(SelectedPrograms::default()),
        }
    }

    pub fn save(&self, schedule_id: &str, selected: &SelectedPrograms) -> RepositoryResult<()> {
        let json = serde_json::to_string(selected)?;
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO program_selection (schedule_id, selection_json, updated_at)
               VALUES (?1, ?2, ?3)
               ON CONFLICT(schedule_id) DO UPDATE SET selection_json = ?2, updated_at = ?3"#,
            params![schedule_id, json, Utc::now().to_rfc3339()],
        )?;

        Ok(())
    }
}
