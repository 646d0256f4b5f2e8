// ==========================================
// Course Planner - PrerequisiteEvaluator
// ==========================================
// Pure functions, no catalog access.
// Prerequisite group: satisfied by prior completion only.
// Corequisite group: satisfied by prior completion or same-semester enrollment.
// Overall: AND across every group in both lists.
// ==========================================

use crate::domain::course::{normalize_course_id, CoursePrerequisites, PrerequisiteGroup};
use crate::domain::schedule::Schedule;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Outcome of evaluating one course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteCheck {
    pub course_id: String,
    pub satisfied: bool,
    /// Failed groups: prerequisite groups first, then corequisite groups, each in input order
    pub unmet_groups: Vec<PrerequisiteGroup>,
    /// Set when the catalog had no prerequisite data for the course
    pub data_unavailable: bool,
}

impl PrerequisiteCheck {
    /// Display lines for the unmet groups
    pub fn warnings(&self) -> Vec<String> {
        if self.data_unavailable {
            return vec![format!("Prerequisite data unavailable for {}", self.course_id)];
        }

        self.unmet_groups
            .iter()
            .map(|group| {
                let label = if group.is_corequisite {
                    "Missing corequisite (same semester or earlier)"
                } else {
                    "Missing prerequisite"
                };
                if group.courses.len() > 1 {
                    format!("{}: choose one of {}", label, group.describe())
                } else {
                    format!("{}: {}", label, group.describe())
                }
            })
            .collect()
    }

    /// Canonical ids of every course in the unmet groups, deduplicated
    pub fn missing_course_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.unmet_groups
            .iter()
            .flat_map(|g| g.course_ids())
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }
}

// ==========================================
// PrerequisiteEvaluator
// ==========================================
pub struct PrerequisiteEvaluator;

impl PrerequisiteEvaluator {
    /// Evaluates a course's groups against the two course-id sets.
    ///
    /// Both sets are expected in canonical form (see `course_id_set`).
    /// A course with no groups is satisfied.
    pub fn evaluate(
        prereqs: &CoursePrerequisites,
        completed_before: &HashSet<String>,
        planned_concurrent: &HashSet<String>,
    ) -> PrerequisiteCheck {
        let mut unmet_groups = Vec::new();

        for group in &prereqs.prerequisite_groups {
            if !group_met(group, |id| completed_before.contains(id)) {
                unmet_groups.push(group.clone());
            }
        }

        for group in &prereqs.corequisite_groups {
            if !group_met(group, |id| {
                completed_before.contains(id) || planned_concurrent.contains(id)
            }) {
                unmet_groups.push(group.clone());
            }
        }

        PrerequisiteCheck {
            course_id: normalize_course_id(&prereqs.course_id),
            satisfied: unmet_groups.is_empty(),
            unmet_groups,
            data_unavailable: false,
        }
    }

    /// Result used when the catalog cannot supply prerequisite data.
    /// Fails closed: never reports the course as satisfied.
    pub fn unavailable(course_id: &str) -> PrerequisiteCheck {
        PrerequisiteCheck {
            course_id: normalize_course_id(course_id),
            satisfied: false,
            unmet_groups: Vec::new(),
            data_unavailable: true,
        }
    }

    /// Evaluates every planned course of the schedule and returns a copy with
    /// `prereqs_met` / `warnings` set.
    ///
    /// Earlier semesters are those before the course's semester in list order;
    /// concurrent courses are the other courses of the same semester.
    /// Courses missing from `prereqs_by_course` fail closed.
    pub fn annotate_schedule(
        schedule: &Schedule,
        prereqs_by_course: &HashMap<String, CoursePrerequisites>,
    ) -> (Schedule, Vec<PrerequisiteCheck>) {
        let mut annotated = schedule.clone();
        let mut checks = Vec::new();
        let mut completed: HashSet<String> = HashSet::new();

        for semester in annotated.semesters.iter_mut() {
            let in_semester = course_id_set(semester.courses.iter().map(|c| c.course_id.as_str()));

            for course in semester.courses.iter_mut() {
                let course_id = normalize_course_id(&course.course_id);
                let mut concurrent = in_semester.clone();
                concurrent.remove(&course_id);

                let check = match prereqs_by_course.get(&course_id) {
                    Some(prereqs) => Self::evaluate(prereqs, &completed, &concurrent),
                    None => Self::unavailable(&course_id),
                };

                let warnings = check.warnings();
                course.prereqs_met = Some(check.satisfied);
                course.warnings = if warnings.is_empty() { None } else { Some(warnings) };
                checks.push(check);
            }

            completed.extend(in_semester);
        }

        (annotated, checks)
    }
}

fn group_met(group: &PrerequisiteGroup, is_met: impl Fn(&str) -> bool) -> bool {
    group.course_ids().any(|id| is_met(&id))
}

/// Canonical id set from any iterator of ids
pub fn course_id_set<I, S>(ids: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter()
        .map(|id| normalize_course_id(id.as_ref()))
        .collect()
}
