// ==========================================
// Course Planner - program and requirement model
// ==========================================
// Definitions come from the catalog as-is; the engine does not
// validate that a category is well-formed.
// ==========================================

use crate::domain::types::{ProgramType, RequirementType};
use serde::{Deserialize, Serialize};

// ==========================================
// Program
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub program_id: String,
    pub name: String,
    pub program_type: ProgramType,
    #[serde(default)]
    pub degree_type: Option<String>,
    #[serde(default)]
    pub total_hours: Option<u32>,          // declared total, source of truth for percentages
    #[serde(default)]
    pub url: Option<String>,
}

impl Program {
    pub fn new(
        program_id: impl Into<String>,
        name: impl Into<String>,
        program_type: ProgramType,
        total_hours: Option<u32>,
    ) -> Self {
        Self {
            program_id: program_id.into(),
            name: name.into(),
            program_type,
            degree_type: None,
            total_hours,
            url: None,
        }
    }
}

// ==========================================
// RequirementCourse
// ==========================================
// is_required = true: must take
// is_required = false: counts toward a choose-N pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementCourse {
    pub course_id: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub credits: Option<String>,
    pub is_required: bool,
}

impl RequirementCourse {
    pub fn new(course_id: impl Into<String>, credits: Option<&str>, is_required: bool) -> Self {
        Self {
            course_id: course_id.into(),
            course_name: String::new(),
            credits: credits.map(str::to_string),
            is_required,
        }
    }
}

// ==========================================
// RequirementCategory
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementCategory {
    #[serde(default)]
    pub id: i64,
    pub program_id: String,
    pub requirement_type: RequirementType,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub min_credits: Option<u32>,
    #[serde(default)]
    pub min_courses: Option<u32>,
    #[serde(default)]
    pub selection_notes: Option<String>,
    #[serde(default)]
    pub level_requirement: Option<String>,
    #[serde(default)]
    pub other_restrictions: Option<String>,
    #[serde(default)]
    pub courses: Vec<RequirementCourse>,
}

impl RequirementCategory {
    pub fn new(
        program_id: impl Into<String>,
        requirement_type: RequirementType,
        category_name: impl Into<String>,
        courses: Vec<RequirementCourse>,
    ) -> Self {
        Self {
            id: 0,
            program_id: program_id.into(),
            requirement_type,
            category_name: Some(category_name.into()),
            min_credits: None,
            min_courses: None,
            selection_notes: None,
            level_requirement: None,
            other_restrictions: None,
            courses,
        }
    }

    /// Display name, falling back to the type tag
    pub fn display_name(&self) -> String {
        self.category_name
            .clone()
            .unwrap_or_else(|| self.requirement_type.to_string())
    }
}

// ==========================================
// SelectedPrograms
// ==========================================
// Persisted shape: {majors: [Program], minors: [Program]}
// Certificates are kept with the minors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectedPrograms {
    #[serde(default)]
    pub majors: Vec<Program>,
    #[serde(default)]
    pub minors: Vec<Program>,
}

impl SelectedPrograms {
    pub fn total(&self) -> usize {
        self.majors.len() + self.minors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Majors first, then minors
    pub fn iter(&self) -> impl Iterator<Item = &Program> {
        self.majors.iter().chain(self.minors.iter())
    }

    pub fn contains(&self, program_id: &str) -> bool {
        self.iter().any(|p| p.program_id == program_id)
    }
}
