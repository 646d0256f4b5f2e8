// ==========================================
// Course Planner - PlannerApi
// ==========================================
// Service layer used by the CLI (or any other front end):
// 1. schedule lifecycle (create, load, list, delete)
// 2. schedule commands with optimistic locking
// 3. catalog search
// 4. program selection
// 5. prerequisite checks and the full planner report
// ==========================================
// Commands are serialized per schedule through the stored revision:
// a command computed against a stale snapshot is rejected, never merged.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::catalog::CatalogReader;
use crate::config::PlannerConfigReader;
use crate::domain::course::Course;
use crate::domain::program::SelectedPrograms;
use crate::domain::schedule::PlannedCourse;
use crate::engine::planner::{PlannerOrchestrator, PlannerReport};
use crate::engine::prerequisite::PrerequisiteCheck;
use crate::engine::program_selection::{ProgramSelection, SelectionOutcome};
use crate::engine::schedule_store::{MutationOutcome, ScheduleCommand, ScheduleStore};
use crate::repository::program_selection_repo::ProgramSelectionRepository;
use crate::repository::schedule_repo::{ScheduleListEntry, ScheduleRepository, StoredSchedule};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, instrument};

/// Result of a schedule command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// Stored state after the command (unchanged unless Applied)
    pub schedule: StoredSchedule,
    pub outcome: MutationOutcome,
}

/// Result of a program selection change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub selected: SelectedPrograms,
    pub outcome: SelectionOutcome,
}

// ==========================================
// PlannerApi
// ==========================================
pub struct PlannerApi<C, G>
where
    C: CatalogReader,
    G: PlannerConfigReader,
{
    schedule_repo: Arc<ScheduleRepository>,
    selection_repo: Arc<ProgramSelectionRepository>,
    catalog: Arc<C>,
    config: Arc<G>,
    planner: PlannerOrchestrator<C>,
    // load-modify-save of a program selection runs under this lock
    selection_lock: Mutex<()>,
}

impl<C, G> PlannerApi<C, G>
where
    C: CatalogReader,
    G: PlannerConfigReader,
{
    pub fn new(
        schedule_repo: Arc<ScheduleRepository>,
        selection_repo: Arc<ProgramSelectionRepository>,
        catalog: Arc<C>,
        config: Arc<G>,
    ) -> Self {
        Self {
            planner: PlannerOrchestrator::new(catalog.clone()),
            schedule_repo,
            selection_repo,
            catalog,
            config,
            selection_lock: Mutex::new(()),
        }
    }

    /// Store seeded with the configured schedule defaults
    async fn schedule_store(&self) -> ApiResult<ScheduleStore> {
        Ok(ScheduleStore::new(self.config.get_schedule_defaults().await?))
    }

    // ==========================================
    // Schedules
    // ==========================================

    /// Creates and stores a schedule with the configured defaults.
    /// A blank name falls back to the configured default name.
    #[instrument(skip(self))]
    pub async fn create_schedule(&self, name: Option<&str>) -> ApiResult<StoredSchedule> {
        let store = self.schedule_store().await?;
        let name = name.map(str::trim).filter(|n| !n.is_empty());

        let schedule = store.create_schedule(name);
        let stored = self.schedule_repo.insert(&schedule)?;

        info!(schedule_id = %schedule.id, semesters = schedule.semesters.len(), "schedule created");
        Ok(stored)
    }

    pub fn get_schedule(&self, schedule_id: &str) -> ApiResult<StoredSchedule> {
        self.schedule_repo
            .find_by_id(schedule_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Schedule(id={}) does not exist", schedule_id)))
    }

    pub fn list_schedules(&self) -> ApiResult<Vec<ScheduleListEntry>> {
        Ok(self.schedule_repo.list()?)
    }

    pub fn delete_schedule(&self, schedule_id: &str) -> ApiResult<()> {
        if !self.schedule_repo.delete(schedule_id)? {
            return Err(ApiError::NotFound(format!(
                "Schedule(id={}) does not exist",
                schedule_id
            )));
        }
        info!(schedule_id, "schedule deleted");
        Ok(())
    }

    /// Applies one command against the snapshot at `expected_revision`.
    ///
    /// # Returns
    /// - Ok(CommandResult): Applied, NoOp or NotFound outcome
    ///
    /// # Errors
    /// - `ApiError::OptimisticLockFailure`: the caller's revision is stale
    /// - `ApiError::NotFound`: unknown schedule
    #[instrument(skip(self, command), fields(command = command.name()))]
    pub async fn apply_command(
        &self,
        schedule_id: &str,
        expected_revision: i64,
        command: &ScheduleCommand,
    ) -> ApiResult<CommandResult> {
        let stored = self.get_schedule(schedule_id)?;
        if stored.revision != expected_revision {
            return Err(ApiError::OptimisticLockFailure(format!(
                "schedule {} is at revision {}, command was built against revision {}",
                schedule_id, stored.revision, expected_revision
            )));
        }

        let mutation = self.schedule_store().await?.apply(&stored.schedule, command);
        if !mutation.is_applied() {
            info!(schedule_id, outcome = %mutation.outcome, "schedule command not applied");
            return Ok(CommandResult {
                schedule: stored,
                outcome: mutation.outcome,
            });
        }

        let revision = self
            .schedule_repo
            .save_with_revision(&mutation.schedule, expected_revision)?;

        Ok(CommandResult {
            schedule: StoredSchedule {
                schedule: mutation.schedule,
                revision,
            },
            outcome: mutation.outcome,
        })
    }

    /// Resolves the course in the catalog, then adds it to the semester.
    #[instrument(skip(self))]
    pub async fn add_catalog_course(
        &self,
        schedule_id: &str,
        expected_revision: i64,
        semester_id: &str,
        course_id: &str,
    ) -> ApiResult<CommandResult> {
        let course = self
            .catalog
            .get_course(course_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Course(id={}) does not exist", course_id)))?;

        let command = ScheduleCommand::AddCourse {
            semester_id: semester_id.to_string(),
            course: PlannedCourse::from(&course),
        };
        self.apply_command(schedule_id, expected_revision, &command).await
    }

    // ==========================================
    // Catalog
    // ==========================================

    /// Search capped at the configured limit
    pub async fn search_courses(&self, query: &str) -> ApiResult<Vec<Course>> {
        let limit = self.config.get_search_limit().await?;
        Ok(self.catalog.search_courses(query, limit).await?)
    }

    // ==========================================
    // Program selection
    // ==========================================

    pub fn get_selected_programs(&self, schedule_id: &str) -> ApiResult<SelectedPrograms> {
        self.get_schedule(schedule_id)?;
        Ok(self.selection_repo.load(schedule_id)?)
    }

    /// Looks up the program and adds it if the caps allow.
    /// A rejection is returned as an outcome, not an error.
    ///
    /// The catalog lookup happens before the selection is loaded, and the
    /// load-check-save runs under `selection_lock`, so overlapping calls on
    /// one `PlannerApi` never drop each other's changes. Writers in other
    /// processes sharing the database file are not serialized.
    #[instrument(skip(self))]
    pub async fn add_program(&self, schedule_id: &str, program_id: &str) -> ApiResult<SelectionResult> {
        self.get_schedule(schedule_id)?;
        let program = self
            .catalog
            .get_program(program_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Program(id={}) does not exist", program_id)))?;

        let _guard = self.lock_selection()?;
        let selected = self.selection_repo.load(schedule_id)?;
        let (next, outcome) = ProgramSelection::add_program(&selected, program);
        if outcome.is_accepted() {
            self.selection_repo.save(schedule_id, &next)?;
            info!(schedule_id, program_id, total = next.total(), "program added");
        }

        Ok(SelectionResult {
            selected: next,
            outcome,
        })
    }

    pub fn remove_program(&self, schedule_id: &str, program_id: &str) -> ApiResult<SelectedPrograms> {
        self.get_schedule(schedule_id)?;
        let _guard = self.lock_selection()?;
        let selected = self.selection_repo.load(schedule_id)?;
        let next = ProgramSelection::remove_program(&selected, program_id);
        if next != selected {
            self.selection_repo.save(schedule_id, &next)?;
            info!(schedule_id, program_id, "program removed");
        }
        Ok(next)
    }

    fn lock_selection(&self) -> ApiResult<MutexGuard<'_, ()>> {
        self.selection_lock.lock().map_err(|e| {
            ApiError::DatabaseConnectionError(format!("failed to acquire selection lock: {}", e))
        })
    }

    // ==========================================
    // Evaluation
    // ==========================================

    /// Prerequisite check for a course in one semester of a stored schedule.
    pub async fn check_course(
        &self,
        schedule_id: &str,
        semester_id: &str,
        course_id: &str,
    ) -> ApiResult<PrerequisiteCheck> {
        let stored = self.get_schedule(schedule_id)?;
        if stored.schedule.find_semester(semester_id).is_none() {
            return Err(ApiError::InvalidInput(format!(
                "semester {} is not part of schedule {}",
                semester_id, schedule_id
            )));
        }
        Ok(self
            .planner
            .check_course(&stored.schedule, semester_id, course_id)
            .await?)
    }

    /// Recomputes the full report from the stored schedule and selection.
    #[instrument(skip(self))]
    pub async fn get_report(
        &self,
        schedule_id: &str,
        current_semester_id: Option<&str>,
    ) -> ApiResult<PlannerReport> {
        let stored = self.get_schedule(schedule_id)?;
        let selected = self.selection_repo.load(schedule_id)?;
        Ok(self
            .planner
            .build_report(&stored.schedule, &selected, current_semester_id)
            .await?)
    }
}
