// ==========================================
// Course Planner - ScheduleStore
// ==========================================
// Owns schedule mutation and read projections.
// Every mutation takes a snapshot and returns a new one; the input
// snapshot is never modified.
// Unknown ids never raise: the unchanged snapshot is returned with
// an explicit NotFound outcome.
// ==========================================

use crate::domain::course::{normalize_course_id, parse_credits_strict};
use crate::domain::schedule::{semester_id, PlannedCourse, Schedule, Semester};
use crate::domain::types::Term;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Mutation outcome
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationOutcome {
    /// Snapshot changed, updated_at advanced
    Applied,
    /// Valid request with nothing to do
    NoOp { reason: String },
    /// Referenced semester or course does not exist
    NotFound { entity: String, id: String },
}

impl MutationOutcome {
    fn not_found(entity: &str, id: &str) -> Self {
        MutationOutcome::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    fn no_op(reason: impl Into<String>) -> Self {
        MutationOutcome::NoOp {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MutationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationOutcome::Applied => write!(f, "APPLIED"),
            MutationOutcome::NoOp { reason } => write!(f, "NO_OP: {}", reason),
            MutationOutcome::NotFound { entity, id } => {
                write!(f, "NOT_FOUND: {} with id={}", entity, id)
            }
        }
    }
}

/// Result of a mutation: the next snapshot plus what happened
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub schedule: Schedule,
    pub outcome: MutationOutcome,
}

impl Mutation {
    pub fn is_applied(&self) -> bool {
        self.outcome == MutationOutcome::Applied
    }

    fn unchanged(schedule: &Schedule, outcome: MutationOutcome) -> Self {
        Self {
            schedule: schedule.clone(),
            outcome,
        }
    }
}

// ==========================================
// ScheduleCommand
// ==========================================
// The unit of state change; UI gestures map onto these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleCommand {
    AddSemester,
    RemoveSemester {
        semester_id: String,
    },
    AddCourse {
        semester_id: String,
        course: PlannedCourse,
    },
    RemoveCourse {
        semester_id: String,
        course_id: String,
    },
    MoveCourse {
        from_semester_id: String,
        to_semester_id: String,
        course_id: String,
    },
}

impl ScheduleCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ScheduleCommand::AddSemester => "add_semester",
            ScheduleCommand::RemoveSemester { .. } => "remove_semester",
            ScheduleCommand::AddCourse { .. } => "add_course",
            ScheduleCommand::RemoveCourse { .. } => "remove_course",
            ScheduleCommand::MoveCourse { .. } => "move_course",
        }
    }
}

// ==========================================
// ScheduleDefaults
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDefaults {
    pub name: String,
    pub start_term: Term,
    pub start_year: i32,
    pub semester_count: usize,
}

impl Default for ScheduleDefaults {
    fn default() -> Self {
        Self {
            name: "My Schedule".to_string(),
            start_term: Term::Fall,
            start_year: Utc::now().year(),
            semester_count: 2,
        }
    }
}

// ==========================================
// ScheduleStore
// ==========================================
pub struct ScheduleStore {
    clock: fn() -> DateTime<Utc>,
    defaults: ScheduleDefaults,
}

impl Default for ScheduleStore {
    fn default() -> Self {
        Self::new(ScheduleDefaults::default())
    }
}

impl ScheduleStore {
    pub fn new(defaults: ScheduleDefaults) -> Self {
        Self {
            clock: Utc::now,
            defaults,
        }
    }

    /// Replaces the time source used for createdAt/updatedAt
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn defaults(&self) -> &ScheduleDefaults {
        &self.defaults
    }

    /// New schedule seeded from the defaults
    pub fn create_schedule(&self, name: Option<&str>) -> Schedule {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.defaults.name);

        Schedule::with_semesters(
            uuid::Uuid::new_v4().to_string(),
            name,
            self.defaults.start_term,
            self.defaults.start_year,
            self.defaults.semester_count,
            (self.clock)(),
        )
    }

    /// Applies a command to the snapshot
    pub fn apply(&self, schedule: &Schedule, command: &ScheduleCommand) -> Mutation {
        match command {
            ScheduleCommand::AddSemester => self.add_semester(schedule),
            ScheduleCommand::RemoveSemester { semester_id } => {
                self.remove_semester(schedule, semester_id)
            }
            ScheduleCommand::AddCourse {
                semester_id,
                course,
            } => self.add_course(schedule, semester_id, course.clone()),
            ScheduleCommand::RemoveCourse {
                semester_id,
                course_id,
            } => self.remove_course(schedule, semester_id, course_id),
            ScheduleCommand::MoveCourse {
                from_semester_id,
                to_semester_id,
                course_id,
            } => self.move_course(schedule, from_semester_id, to_semester_id, course_id),
        }
    }

    // ==========================================
    // Mutations
    // ==========================================

    /// Appends the semester that follows the last one in list order.
    ///
    /// An empty schedule restarts from the configured start term.
    /// A derived id already present gets a numeric suffix ("spring-2025-2").
    pub fn add_semester(&self, schedule: &Schedule) -> Mutation {
        let (term, year) = match schedule.semesters.last() {
            Some(last) => last.term.successor(last.year),
            None => (self.defaults.start_term, self.defaults.start_year),
        };

        let mut semester = Semester::new(term, year);
        semester.id = unique_semester_id(schedule, term, year);

        tracing::debug!(schedule_id = %schedule.id, semester_id = %semester.id, "add_semester");

        let mut next = schedule.clone();
        next.semesters.push(semester);
        self.applied(next)
    }

    pub fn remove_semester(&self, schedule: &Schedule, semester_id: &str) -> Mutation {
        let Some(index) = schedule.semester_index(semester_id) else {
            return self.not_found(schedule, "semester", semester_id);
        };

        let mut next = schedule.clone();
        let removed = next.semesters.remove(index);
        tracing::debug!(
            schedule_id = %schedule.id,
            semester_id,
            dropped_courses = removed.courses.len(),
            "remove_semester"
        );
        self.applied(next)
    }

    /// Appends a course to the semester.
    ///
    /// A course id already planned in that semester is a no-op rather than a
    /// second append. This departs from the web planner, which appended
    /// duplicates; one entry per id keeps `remove_course` and `move_course`
    /// unambiguous. `move_course` onto a semester holding the id is a no-op
    /// for the same reason.
    pub fn add_course(
        &self,
        schedule: &Schedule,
        semester_id: &str,
        course: PlannedCourse,
    ) -> Mutation {
        let Some(index) = schedule.semester_index(semester_id) else {
            return self.not_found(schedule, "semester", semester_id);
        };

        let mut course = course;
        course.course_id = normalize_course_id(&course.course_id);

        if schedule.semesters[index].contains_course(&course.course_id) {
            return Mutation::unchanged(
                schedule,
                MutationOutcome::no_op(format!(
                    "{} is already planned in {}",
                    course.course_id, semester_id
                )),
            );
        }

        tracing::debug!(schedule_id = %schedule.id, semester_id, course_id = %course.course_id, "add_course");

        let mut next = schedule.clone();
        next.semesters[index].courses.push(course);
        self.applied(next)
    }

    pub fn remove_course(&self, schedule: &Schedule, semester_id: &str, course_id: &str) -> Mutation {
        let Some(index) = schedule.semester_index(semester_id) else {
            return self.not_found(schedule, "semester", semester_id);
        };

        let course_id = normalize_course_id(course_id);
        if !schedule.semesters[index].contains_course(&course_id) {
            return self.not_found(schedule, "course", &course_id);
        }

        let mut next = schedule.clone();
        next.semesters[index]
            .courses
            .retain(|c| c.course_id != course_id);
        tracing::debug!(schedule_id = %schedule.id, semester_id, course_id = %course_id, "remove_course");
        self.applied(next)
    }

    /// Removes the course from the source semester and appends it to the
    /// destination in one step. Course count is conserved.
    pub fn move_course(
        &self,
        schedule: &Schedule,
        from_semester_id: &str,
        to_semester_id: &str,
        course_id: &str,
    ) -> Mutation {
        let course_id = normalize_course_id(course_id);

        let Some(from_index) = schedule.semester_index(from_semester_id) else {
            return self.not_found(schedule, "semester", from_semester_id);
        };
        let Some(course) = schedule.semesters[from_index]
            .courses
            .iter()
            .find(|c| c.course_id == course_id)
            .cloned()
        else {
            return self.not_found(schedule, "course", &course_id);
        };

        if from_semester_id == to_semester_id {
            return Mutation::unchanged(
                schedule,
                MutationOutcome::no_op("source and destination semester are the same"),
            );
        }

        let Some(to_index) = schedule.semester_index(to_semester_id) else {
            return self.not_found(schedule, "semester", to_semester_id);
        };
        if schedule.semesters[to_index].contains_course(&course_id) {
            return Mutation::unchanged(
                schedule,
                MutationOutcome::no_op(format!(
                    "{} is already planned in {}",
                    course_id, to_semester_id
                )),
            );
        }

        let mut next = schedule.clone();
        next.semesters[from_index]
            .courses
            .retain(|c| c.course_id != course_id);
        next.semesters[to_index].courses.push(course);

        tracing::debug!(
            schedule_id = %schedule.id,
            from = from_semester_id,
            to = to_semester_id,
            course_id = %course_id,
            "move_course"
        );
        self.applied(next)
    }

    // ==========================================
    // Read projections
    // ==========================================

    /// Ids of every course in semesters preceding `before_semester_id` in
    /// list order. `None`, or an id not in the schedule, yields every course.
    pub fn get_completed_courses(
        &self,
        schedule: &Schedule,
        before_semester_id: Option<&str>,
    ) -> Vec<String> {
        completed_before(schedule, before_semester_id)
    }

    /// Sum of whole-integer credit values; unparseable strings count as 0.
    /// An unknown semester totals 0.
    pub fn get_total_credits(&self, schedule: &Schedule, semester_id: &str) -> u32 {
        schedule
            .find_semester(semester_id)
            .map(semester_credits)
            .unwrap_or(0)
    }

    fn applied(&self, mut next: Schedule) -> Mutation {
        next.updated_at = (self.clock)();
        Mutation {
            schedule: next,
            outcome: MutationOutcome::Applied,
        }
    }

    fn not_found(&self, schedule: &Schedule, entity: &str, id: &str) -> Mutation {
        tracing::warn!(schedule_id = %schedule.id, entity, id, "schedule mutation target not found");
        Mutation::unchanged(schedule, MutationOutcome::not_found(entity, id))
    }
}

// ==========================================
// Free helpers (shared with the orchestrator)
// ==========================================

pub(crate) fn completed_before(schedule: &Schedule, before_semester_id: Option<&str>) -> Vec<String> {
    let mut completed = Vec::new();
    for semester in &schedule.semesters {
        if before_semester_id == Some(semester.id.as_str()) {
            break;
        }
        completed.extend(semester.courses.iter().map(|c| c.course_id.clone()));
    }
    completed
}

/// Saturates at u32::MAX instead of overflowing
pub(crate) fn semester_credits(semester: &Semester) -> u32 {
    semester
        .courses
        .iter()
        .map(|c| parse_credits_strict(&c.credits))
        .fold(0u32, u32::saturating_add)
}

fn unique_semester_id(schedule: &Schedule, term: Term, year: i32) -> String {
    let base = semester_id(term, year);
    if schedule.find_semester(&base).is_none() {
        return base;
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| schedule.find_semester(candidate).is_none())
        .unwrap_or(base)
}
