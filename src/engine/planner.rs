// ==========================================
// Course Planner - PlannerOrchestrator
// ==========================================
// Fetches catalog data, then runs the pure engines in order:
// 1. prerequisite annotation of every planned course
// 2. per-semester credit summaries
// 3. completed / planned split
// 4. progress per selected program
// 5. gen-ed progress
// ==========================================

use crate::catalog::CatalogReader;
use crate::domain::course::{normalize_course_id, CoursePrerequisites};
use crate::domain::program::SelectedPrograms;
use crate::domain::progress::{GenEdProgress, ProgressSnapshot};
use crate::domain::schedule::Schedule;
use crate::engine::credit_load::{CreditLoadValidator, SemesterSummary};
use crate::engine::gen_ed::GenEdTracker;
use crate::engine::prerequisite::{course_id_set, PrerequisiteCheck, PrerequisiteEvaluator};
use crate::engine::requirements::RequirementsAggregator;
use crate::engine::schedule_store::completed_before;
use crate::repository::error::RepositoryResult;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

// ==========================================
// PlannerReport
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerReport {
    /// Schedule with prereqsMet / warnings filled in
    pub schedule: Schedule,
    pub prerequisite_checks: Vec<PrerequisiteCheck>,
    pub semesters: Vec<SemesterSummary>,
    pub programs: Vec<ProgressSnapshot>,
    pub gen_ed: GenEdProgress,
    pub completed_course_ids: Vec<String>,
    pub planned_course_ids: Vec<String>,
}

impl PlannerReport {
    pub fn unmet_prerequisite_count(&self) -> usize {
        self.prerequisite_checks.iter().filter(|c| !c.satisfied).count()
    }
}

/// Completed and planned id sets (canonical form)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseSplit {
    pub completed: HashSet<String>,
    pub planned: HashSet<String>,
}

impl CourseSplit {
    /// Courses in semesters before `current_semester_id` are completed,
    /// the rest planned. Without a current semester (or with an id not in
    /// the schedule) every scheduled course counts as completed.
    pub fn from_schedule(schedule: &Schedule, current_semester_id: Option<&str>) -> Self {
        let completed = course_id_set(completed_before(schedule, current_semester_id));
        let planned = course_id_set(schedule.all_course_ids())
            .into_iter()
            .filter(|id| !completed.contains(id))
            .collect();
        Self { completed, planned }
    }

    fn sorted(ids: &HashSet<String>) -> Vec<String> {
        let mut ids: Vec<String> = ids.iter().cloned().collect();
        ids.sort();
        ids
    }
}

// ==========================================
// PlannerOrchestrator
// ==========================================
pub struct PlannerOrchestrator<C>
where
    C: CatalogReader,
{
    catalog: Arc<C>,
}

impl<C> PlannerOrchestrator<C>
where
    C: CatalogReader,
{
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<C> {
        &self.catalog
    }

    /// Annotates every planned course with its prerequisite result.
    ///
    /// A catalog error for one course is treated like missing data for
    /// that course: it fails closed and the rest of the schedule is still
    /// evaluated.
    #[instrument(skip(self, schedule), fields(schedule_id = %schedule.id))]
    pub async fn annotate_schedule(
        &self,
        schedule: &Schedule,
    ) -> (Schedule, Vec<PrerequisiteCheck>) {
        let course_ids: Vec<String> = course_id_set(schedule.all_course_ids()).into_iter().collect();

        let lookups = course_ids.iter().map(|id| async move {
            (id.clone(), self.catalog.get_course_prerequisites(id).await)
        });

        let mut prereqs_by_course: HashMap<String, CoursePrerequisites> = HashMap::new();
        for (course_id, result) in join_all(lookups).await {
            match result {
                Ok(Some(prereqs)) => {
                    prereqs_by_course.insert(course_id, prereqs);
                }
                Ok(None) => {
                    debug!(course_id = %course_id, "no prerequisite data");
                }
                Err(e) => {
                    warn!(course_id = %course_id, error = %e, "prerequisite lookup failed");
                }
            }
        }

        PrerequisiteEvaluator::annotate_schedule(schedule, &prereqs_by_course)
    }

    /// Evaluates a single course as if it were added to `semester_id`.
    ///
    /// An unknown semester evaluates against the whole schedule as prior work.
    #[instrument(skip(self, schedule), fields(schedule_id = %schedule.id))]
    pub async fn check_course(
        &self,
        schedule: &Schedule,
        semester_id: &str,
        course_id: &str,
    ) -> RepositoryResult<PrerequisiteCheck> {
        let course_id = normalize_course_id(course_id);
        let completed = course_id_set(completed_before(schedule, Some(semester_id)));
        let mut concurrent = schedule
            .find_semester(semester_id)
            .map(|s| course_id_set(s.courses.iter().map(|c| c.course_id.as_str())))
            .unwrap_or_default();
        concurrent.remove(&course_id);

        let check = match self.catalog.get_course_prerequisites(&course_id).await? {
            Some(prereqs) => PrerequisiteEvaluator::evaluate(&prereqs, &completed, &concurrent),
            None => PrerequisiteEvaluator::unavailable(&course_id),
        };
        Ok(check)
    }

    /// One snapshot per selected program, majors first.
    #[instrument(skip_all, fields(programs = selected.total()))]
    pub async fn compute_program_progress(
        &self,
        selected: &SelectedPrograms,
        split: &CourseSplit,
    ) -> RepositoryResult<Vec<ProgressSnapshot>> {
        let fetches = selected.iter().map(|program| async move {
            self.catalog
                .get_program_requirements(&program.program_id)
                .await
                .map(|categories| (program, categories))
        });

        let mut snapshots = Vec::with_capacity(selected.total());
        for result in join_all(fetches).await {
            let (program, categories) = result?;
            snapshots.push(RequirementsAggregator::compute_progress(
                program,
                &categories,
                &split.completed,
                &split.planned,
            ));
        }
        Ok(snapshots)
    }

    #[instrument(skip_all)]
    pub async fn compute_gen_ed(&self, completed: &HashSet<String>) -> RepositoryResult<GenEdProgress> {
        let catalog = self.catalog.get_gen_ed_catalog().await?;
        Ok(GenEdTracker::compute_gen_ed(&catalog, completed))
    }

    /// Full read model for one schedule and program selection.
    #[instrument(skip(self, schedule, selected), fields(schedule_id = %schedule.id))]
    pub async fn build_report(
        &self,
        schedule: &Schedule,
        selected: &SelectedPrograms,
        current_semester_id: Option<&str>,
    ) -> RepositoryResult<PlannerReport> {
        let (annotated, prerequisite_checks) = self.annotate_schedule(schedule).await;
        let semesters = CreditLoadValidator::summarize(schedule);
        let split = CourseSplit::from_schedule(schedule, current_semester_id);

        let programs = self.compute_program_progress(selected, &split).await?;
        let gen_ed = self.compute_gen_ed(&split.completed).await?;

        let report = PlannerReport {
            schedule: annotated,
            prerequisite_checks,
            semesters,
            programs,
            gen_ed,
            completed_course_ids: CourseSplit::sorted(&split.completed),
            planned_course_ids: CourseSplit::sorted(&split.planned),
        };

        info!(
            courses = schedule.course_count(),
            unmet_prerequisites = report.unmet_prerequisite_count(),
            programs = report.programs.len(),
            gen_ed_fulfilled = report.gen_ed.completed_count,
            "planner report built"
        );

        Ok(report)
    }
}
