// ==========================================
// Course Planner - planner configuration reader
// ==========================================
// Read-only interface; no writes, no planning rules.
// Implementor: ConfigManager (config_kv table)
// ==========================================

use crate::domain::types::Term;
use crate::engine::schedule_store::ScheduleDefaults;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

#[async_trait]
pub trait PlannerConfigReader: Send + Sync {
    /// Name given to a schedule created without one
    ///
    /// # Default
    /// - "My Schedule"
    async fn get_default_schedule_name(&self) -> RepositoryResult<String>;

    /// Term of the first semester of a new schedule
    ///
    /// # Default
    /// - Fall
    async fn get_default_start_term(&self) -> RepositoryResult<Term>;

    /// # Default
    /// - the current calendar year
    async fn get_default_start_year(&self) -> RepositoryResult<i32>;

    /// # Default
    /// - 2
    async fn get_default_semester_count(&self) -> RepositoryResult<usize>;

    /// Result cap for catalog search
    ///
    /// # Default
    /// - 20
    async fn get_search_limit(&self) -> RepositoryResult<usize>;

    /// All schedule-creation settings in one value
    async fn get_schedule_defaults(&self) -> RepositoryResult<ScheduleDefaults> {
        Ok(ScheduleDefaults {
            name: self.get_default_schedule_name().await?,
            start_term: self.get_default_start_term().await?,
            start_year: self.get_default_start_year().await?,
            semester_count: self.get_default_semester_count().await?,
        })
    }
}
