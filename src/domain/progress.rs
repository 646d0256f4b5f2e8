// ==========================================
// Course Planner - progress read models
// ==========================================
// Recomputed on demand from the current schedule and program selection.
// Never persisted as source of truth.
// ==========================================

use crate::domain::program::{Program, RequirementCourse};
use crate::domain::types::{CategoryStatus, RequirementCourseStatus, RequirementType};
use serde::{Deserialize, Serialize};

// ==========================================
// Requirement course with derived status
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementCourseProgress {
    #[serde(flatten)]
    pub course: RequirementCourse,
    pub status: RequirementCourseStatus,
    pub is_completed: bool,
    pub is_planned: bool,
}

impl RequirementCourseProgress {
    pub fn new(course: RequirementCourse, completed: bool, planned: bool) -> Self {
        let status = RequirementCourseStatus::new(course.is_required, completed, planned);
        Self {
            course,
            is_completed: status.is_completed(),
            is_planned: status.is_planned(),
            status,
        }
    }
}

// ==========================================
// Per-category progress
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProgress {
    pub category_id: i64,
    pub requirement_type: RequirementType,
    pub category_name: String,
    pub min_credits: Option<u32>,
    pub min_courses: Option<u32>,
    pub selection_notes: Option<String>,
    pub courses: Vec<RequirementCourseProgress>,
    pub completed_count: u32,
    pub planned_count: u32,
    pub required_count: u32,
    pub status: CategoryStatus,
}

// ==========================================
// ProgressSnapshot - per program
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub program: Program,
    pub total_required_credits: u32,
    pub completed_credits: u32,
    pub planned_credits: u32,
    pub completion_percentage: f64,
    pub requirements: Vec<CategoryProgress>,
}

impl ProgressSnapshot {
    /// max(0, total - completed - planned)
    pub fn remaining_credits(&self) -> u32 {
        self.total_required_credits
            .saturating_sub(self.completed_credits)
            .saturating_sub(self.planned_credits)
    }

    pub fn completed_categories(&self) -> usize {
        self.requirements
            .iter()
            .filter(|c| c.status == CategoryStatus::Complete)
            .count()
    }
}

// ==========================================
// General education
// ==========================================

/// Catalog entry: a gen-ed code and the courses that satisfy it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenEdCode {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub eligible_course_ids: Vec<String>,   // catalog-defined order
}

impl GenEdCode {
    pub fn new(code: impl Into<String>, name: impl Into<String>, eligible: &[&str]) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
            eligible_course_ids: eligible.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenEdRequirement {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub fulfilled: bool,
    pub courses_taken: Vec<String>,
    pub courses_available: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenEdProgress {
    pub requirements: Vec<GenEdRequirement>,
    pub completed_count: u32,
    pub total_count: u32,
}
