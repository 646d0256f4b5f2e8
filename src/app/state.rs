// ==========================================
// Course Planner - application state
// ==========================================
// Wires repositories, config and the API over one shared
// SQLite connection.
// ==========================================

use std::sync::{Arc, Mutex};

use anyhow::Context;

use crate::api::PlannerApi;
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::{ProgramSelectionRepository, ScheduleRepository, SqliteCatalog};

pub type SqlitePlannerApi = PlannerApi<SqliteCatalog, ConfigManager>;

pub struct AppState {
    pub db_path: String,
    pub catalog: Arc<SqliteCatalog>,
    pub config_manager: Arc<ConfigManager>,
    pub planner_api: Arc<SqlitePlannerApi>,
}

impl AppState {
    /// Opens (or creates) the database, ensures the schema and builds the API.
    pub fn new(db_path: &str) -> anyhow::Result<Self> {
        tracing::info!(db_path, "initializing application state");

        let conn = open_sqlite_connection(db_path)
            .with_context(|| format!("cannot open database {}", db_path))?;
        init_schema(&conn).context("schema initialization failed")?;
        let conn = Arc::new(Mutex::new(conn));

        let catalog = Arc::new(SqliteCatalog::new(conn.clone()));
        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone())?);
        let planner_api = Arc::new(PlannerApi::new(
            Arc::new(ScheduleRepository::new(conn.clone())),
            Arc::new(ProgramSelectionRepository::new(conn)),
            catalog.clone(),
            config_manager.clone(),
        ));

        Ok(Self {
            db_path: db_path.to_string(),
            catalog,
            config_manager,
            planner_api,
        })
    }
}

/// Default database location.
///
/// COURSE_PLANNER_DB_PATH wins when set; otherwise the user data directory,
/// falling back to the working directory.
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("COURSE_PLANNER_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./course_planner.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("course-planner");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("course_planner.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_app_state_on_temp_db() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("planner.db");
        let state = AppState::new(db_path.to_str().unwrap()).unwrap();
        assert!(state.planner_api.list_schedules().unwrap().is_empty());
    }
}
