// ==========================================
// Course Planner - domain type definitions
// ==========================================
// Closed enums shared by every layer.
// Serialized spellings match the persisted snapshot shape.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Term
// ==========================================
// Cycle: Fall -> Spring -> Summer I -> Summer II -> Fall
// The year increments only on Fall -> Spring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Fall,
    Spring,
    #[serde(rename = "Summer I")]
    SummerI,
    #[serde(rename = "Summer II")]
    SummerII,
}

impl Term {
    /// Term that follows `self` together with its year.
    /// The year saturates at i32::MAX.
    pub fn successor(self, year: i32) -> (Term, i32) {
        match self {
            Term::Fall => (Term::Spring, year.saturating_add(1)),
            Term::Spring => (Term::SummerI, year),
            Term::SummerI => (Term::SummerII, year),
            Term::SummerII => (Term::Fall, year),
        }
    }

    /// Display name ("Summer I")
    pub fn as_str(&self) -> &'static str {
        match self {
            Term::Fall => "Fall",
            Term::Spring => "Spring",
            Term::SummerI => "Summer I",
            Term::SummerII => "Summer II",
        }
    }

    /// Lower-cased, dash-separated form used in semester ids ("summer-i")
    pub fn slug(&self) -> &'static str {
        match self {
            Term::Fall => "fall",
            Term::Spring => "spring",
            Term::SummerI => "summer-i",
            Term::SummerII => "summer-ii",
        }
    }

    /// Parses a display name or slug, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "fall" => Some(Term::Fall),
            "spring" => Some(Term::Spring),
            "summer i" | "summer 1" => Some(Term::SummerI),
            "summer ii" | "summer 2" => Some(Term::SummerII),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Program type
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramType {
    Major,
    Minor,
    Certificate,
}

impl ProgramType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramType::Major => "major",
            ProgramType::Minor => "minor",
            ProgramType::Certificate => "certificate",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "major" => Some(ProgramType::Major),
            "minor" => Some(ProgramType::Minor),
            "certificate" => Some(ProgramType::Certificate),
            _ => None,
        }
    }
}

impl fmt::Display for ProgramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Requirement category type
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementType {
    Gateway,
    Core,
    Elective,
    AlliedScience,
    Other,
}

impl RequirementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementType::Gateway => "gateway",
            RequirementType::Core => "core",
            RequirementType::Elective => "elective",
            RequirementType::AlliedScience => "allied_science",
            RequirementType::Other => "other",
        }
    }

    /// Unknown tags fall back to `Other`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "gateway" => RequirementType::Gateway,
            "core" => RequirementType::Core,
            "elective" => RequirementType::Elective,
            "allied_science" => RequirementType::AlliedScience,
            _ => RequirementType::Other,
        }
    }
}

impl fmt::Display for RequirementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Credit load classification
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditLoad {
    Normal,
    Underload,
    Overload,
}

impl CreditLoad {
    /// Short label shown next to a semester total; `None` for a normal load.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            CreditLoad::Normal => None,
            CreditLoad::Underload => Some("underload"),
            CreditLoad::Overload => Some("overload"),
        }
    }

    pub fn is_warning(&self) -> bool {
        !matches!(self, CreditLoad::Normal)
    }
}

impl fmt::Display for CreditLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreditLoad::Normal => write!(f, "NORMAL"),
            CreditLoad::Underload => write!(f, "UNDERLOAD"),
            CreditLoad::Overload => write!(f, "OVERLOAD"),
        }
    }
}

// ==========================================
// Requirement category status
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryStatus {
    NotStarted,
    InProgress,
    Complete,
}

impl fmt::Display for CategoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryStatus::NotStarted => write!(f, "NOT_STARTED"),
            CategoryStatus::InProgress => write!(f, "IN_PROGRESS"),
            CategoryStatus::Complete => write!(f, "COMPLETE"),
        }
    }
}

// ==========================================
// Requirement course status
// ==========================================
// (Required | Elective) x (Completed | Planned | Remaining)
// Computed once by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementKind {
    Required,
    Elective,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseState {
    Completed,
    Planned,
    Remaining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequirementCourseStatus {
    pub kind: RequirementKind,
    pub state: CourseState,
}

impl RequirementCourseStatus {
    pub fn new(required: bool, completed: bool, planned: bool) -> Self {
        let kind = if required {
            RequirementKind::Required
        } else {
            RequirementKind::Elective
        };
        let state = if completed {
            CourseState::Completed
        } else if planned {
            CourseState::Planned
        } else {
            CourseState::Remaining
        };
        Self { kind, state }
    }

    pub fn is_completed(&self) -> bool {
        self.state == CourseState::Completed
    }

    pub fn is_planned(&self) -> bool {
        self.state == CourseState::Planned
    }
}
