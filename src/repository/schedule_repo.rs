// ==========================================
// Course Planner - schedule snapshot repository
// ==========================================
// Stores the serde JSON snapshot of a Schedule plus a revision counter.
// Writes go through save_with_revision: a stale writer gets
// OptimisticLockFailure instead of silently overwriting.
// ==========================================

use crate::domain::schedule::Schedule;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Schedule snapshot with the revision it was read at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSchedule {
    pub schedule: Schedule,
    pub revision: i64,
}

/// Row for listing without decoding snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleListEntry {
    pub schedule_id: String,
    pub name: String,
    pub revision: i64,
    pub updated_at: String,
}

// ==========================================
// ScheduleRepository
// ==========================================
pub struct ScheduleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Inserts a new schedule at revision 1
    pub fn insert(&self, schedule: &Schedule) -> RepositoryResult<StoredSchedule> {
        let snapshot_json = serde_json::to_string(schedule)?;
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO schedule (
                schedule_id, name, snapshot_json, revision, created_at, updated_at
            ) VALUES (?, ?, ?, 1, ?, ?)"#,
            params![
                &schedule.id,
                &schedule.name,
                &snapshot_json,
                &schedule.created_at.to_rfc3339(),
                &schedule.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(StoredSchedule {
            schedule: schedule.clone(),
            revision: 1,
        })
    }

    pub fn find_by_id(&self, schedule_id: &str) -> RepositoryResult<Option<StoredSchedule>> {
        let conn = self.get_conn()?;

        let row: Option<(String, i64)> = conn
            .query_row(
                "SELECT snapshot_json, revision FROM schedule WHERE schedule_id = ?",
                params![schedule_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((snapshot_json, revision)) => Ok(Some(StoredSchedule {
                schedule: serde_json::from_str(&snapshot_json)?,
                revision,
            })),
            None => Ok(None),
        }
    }

    /// Most recently updated first
    pub fn list(&self) -> RepositoryResult<Vec<ScheduleListEntry>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT schedule_id, name, revision, updated_at
               FROM schedule
               ORDER BY updated_at DESC, schedule_id"#,
        )?;

        let entries = stmt
            .query_map([], |row| {
                Ok(ScheduleListEntry {
                    schedule_id: row.get(0)?,
                    name: row.get(1)?,
                    revision: row.get(2)?,
                    updated_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Replaces the snapshot if the stored revision still equals
    /// `expected_revision`.
    ///
    /// # Returns
    /// - Ok(new_revision)
    ///
    /// # Errors
    /// - `RepositoryError::OptimisticLockFailure`: another writer saved first
    /// - `RepositoryError::NotFound`: schedule_id does not exist
    pub fn save_with_revision(
        &self,
        schedule: &Schedule,
        expected_revision: i64,
    ) -> RepositoryResult<i64> {
        let snapshot_json = serde_json::to_string(schedule)?;
        let conn = self.get_conn()?;

        let rows_affected = conn.execute(
            r#"UPDATE schedule
               SET name = ?, snapshot_json = ?, updated_at = ?, revision = revision + 1
               WHERE schedule_id = ? AND revision = ?"#,
            params![
                &schedule.name,
                &snapshot_json,
                &schedule.updated_at.to_rfc3339(),
                &schedule.id,
                expected_revision,
            ],
        )?;

        if rows_affected == 0 {
            let actual: Option<i64> = conn
                .query_row(
                    "SELECT revision FROM schedule WHERE schedule_id = ?",
                    params![&schedule.id],
                    |row| row.get(0),
                )
                .optional()?;

            return match actual {
                Some(actual) => {
                    tracing::warn!(
                        schedule_id = %schedule.id,
                        expected = expected_revision,
                        actual,
                        "stale schedule write rejected"
                    );
                    Err(RepositoryError::OptimisticLockFailure {
                        schedule_id: schedule.id.clone(),
                        expected: expected_revision,
                        actual,
                    })
                }
                None => Err(RepositoryError::NotFound {
                    entity: "Schedule".to_string(),
                    id: schedule.id.clone(),
                }),
            };
        }

        Ok(expected_revision + 1)
    }

    /// Returns false when nothing was deleted
    pub fn delete(&self, schedule_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM schedule WHERE schedule_id = ?", params![schedule_id])?;
        Ok(rows > 0)
    }
}
