// ==========================================
// Course Planner - schedule snapshot model
// ==========================================
// A Schedule is an immutable snapshot; ScheduleStore returns a new
// value for every mutation.
// Persisted shape:
// {id, name, semesters: [{id, year, term, courses: [...]}], createdAt, updatedAt}
// ==========================================

use crate::domain::course::{normalize_course_id, Course};
use crate::domain::types::Term;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// PlannedCourse
// ==========================================
// prereqs_met / warnings are written by the evaluator only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedCourse {
    pub course_id: String,
    pub name: String,
    pub credits: String,
    pub department_code: String,
    #[serde(rename = "prereqsMet", default, skip_serializing_if = "Option::is_none")]
    pub prereqs_met: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

impl PlannedCourse {
    pub fn new(
        course_id: impl Into<String>,
        name: impl Into<String>,
        credits: impl Into<String>,
        department_code: impl Into<String>,
    ) -> Self {
        Self {
            course_id: course_id.into(),
            name: name.into(),
            credits: credits.into(),
            department_code: department_code.into(),
            prereqs_met: None,
            warnings: None,
        }
    }
}

impl From<&Course> for PlannedCourse {
    fn from(course: &Course) -> Self {
        PlannedCourse::new(
            normalize_course_id(&course.course_id),
            course.name.clone(),
            course.credits_or_default(),
            course.department_code.clone(),
        )
    }
}

// ==========================================
// Semester
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    pub id: String,
    pub year: i32,
    pub term: Term,
    #[serde(default)]
    pub courses: Vec<PlannedCourse>,
}

impl Semester {
    /// Empty semester with the id derived from term and year
    pub fn new(term: Term, year: i32) -> Self {
        Self {
            id: semester_id(term, year),
            year,
            term,
            courses: Vec::new(),
        }
    }

    pub fn contains_course(&self, course_id: &str) -> bool {
        self.courses.iter().any(|c| c.course_id == course_id)
    }

    /// "Fall 2024"
    pub fn label(&self) -> String {
        format!("{} {}", self.term, self.year)
    }
}

/// "fall-2024", "summer-i-2025"
pub fn semester_id(term: Term, year: i32) -> String {
    format!("{}-{}", term.slug(), year)
}

// ==========================================
// Schedule
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub semesters: Vec<Semester>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    /// Schedule whose first semester is `start_term start_year`, followed by
    /// `semester_count - 1` semesters along the term cycle.
    pub fn with_semesters(
        id: impl Into<String>,
        name: impl Into<String>,
        start_term: Term,
        start_year: i32,
        semester_count: usize,
        now: DateTime<Utc>,
    ) -> Self {
        let mut semesters = Vec::with_capacity(semester_count);
        let (mut term, mut year) = (start_term, start_year);
        for _ in 0..semester_count {
            semesters.push(Semester::new(term, year));
            (term, year) = term.successor(year);
        }

        Self {
            id: id.into(),
            name: name.into(),
            semesters,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn find_semester(&self, semester_id: &str) -> Option<&Semester> {
        self.semesters.iter().find(|s| s.id == semester_id)
    }

    pub fn semester_index(&self, semester_id: &str) -> Option<usize> {
        self.semesters.iter().position(|s| s.id == semester_id)
    }

    /// Course count across all semesters
    pub fn course_count(&self) -> usize {
        self.semesters.iter().map(|s| s.courses.len()).sum()
    }

    /// Every planned course id, in list order
    pub fn all_course_ids(&self) -> Vec<String> {
        self.semesters
            .iter()
            .flat_map(|s| s.courses.iter().map(|c| c.course_id.clone()))
            .collect()
    }
}
