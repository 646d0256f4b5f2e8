// ==========================================
// Course Planner - configuration manager
// ==========================================
// Storage: config_kv table (key-value + scope)
// Only the 'global' scope is read by the planner.
// Missing or malformed values fall back to built-in defaults.
// ==========================================

use crate::config::planner_config_trait::PlannerConfigReader;
use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::types::Term;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{Datelike, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Shares an existing connection; the PRAGMA set is re-applied (idempotent).
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Reads a global-scope value
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Writes a global-scope value (upsert)
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(key, value, "config value updated");
        Ok(())
    }

    /// Every global-scope value as a JSON object, keys sorted
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let config_map = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<BTreeMap<String, String>, _>>()?;

        Ok(serde_json::to_string(&config_map)?)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Parses a stored value, logging and falling back when it is malformed
    fn get_parsed_or_default<T, F>(&self, key: &str, default: T, parse: F) -> RepositoryResult<T>
    where
        F: Fn(&str) -> Option<T>,
    {
        let Some(raw) = self.get_global_config_value(key)? else {
            return Ok(default);
        };
        match parse(raw.trim()) {
            Some(value) => Ok(value),
            None => {
                tracing::warn!(config_key = key, raw_value = %raw, "malformed config value, using default");
                Ok(default)
            }
        }
    }
}

// ==========================================
// PlannerConfigReader implementation
// ==========================================
#[async_trait]
impl PlannerConfigReader for ConfigManager {
    async fn get_default_schedule_name(&self) -> RepositoryResult<String> {
        let name = self.get_config_or_default(config_keys::DEFAULT_SCHEDULE_NAME, "My Schedule")?;
        if name.trim().is_empty() {
            return Ok("My Schedule".to_string());
        }
        Ok(name)
    }

    async fn get_default_start_term(&self) -> RepositoryResult<Term> {
        self.get_parsed_or_default(config_keys::DEFAULT_START_TERM, Term::Fall, Term::parse)
    }

    async fn get_default_start_year(&self) -> RepositoryResult<i32> {
        let current_year = Utc::now().year();
        self.get_parsed_or_default(config_keys::DEFAULT_START_YEAR, current_year, |s| {
            s.parse::<i32>().ok()
        })
    }

    async fn get_default_semester_count(&self) -> RepositoryResult<usize> {
        self.get_parsed_or_default(config_keys::DEFAULT_SEMESTER_COUNT, 2, |s| {
            s.parse::<usize>().ok().filter(|&n| n > 0)
        })
    }

    async fn get_search_limit(&self) -> RepositoryResult<usize> {
        self.get_parsed_or_default(config_keys::SEARCH_LIMIT, 20, |s| {
            s.parse::<usize>().ok().filter(|&n| n > 0)
        })
    }
}

// ==========================================
// Config keys
// ==========================================
pub mod config_keys {
    pub const DEFAULT_SCHEDULE_NAME: &str = "default_schedule_name";
    pub const DEFAULT_START_TERM: &str = "default_start_term";
    pub const DEFAULT_START_YEAR: &str = "default_start_year";
    pub const DEFAULT_SEMESTER_COUNT: &str = "default_semester_count";
    pub const SEARCH_LIMIT: &str = "search_limit";
}
