// ==========================================
// Course Planner - domain layer
// ==========================================
// Entities, snapshots and closed enums.
// No storage access, no rule evaluation.
// ==========================================

pub mod course;
pub mod program;
pub mod progress;
pub mod schedule;
pub mod types;

pub use course::{
    format_credits, nominal_credits, normalize_course_id, parse_credits_strict, Course,
    CoursePrerequisites, CourseRef, PrerequisiteGroup,
};
pub use program::{Program, RequirementCategory, RequirementCourse, SelectedPrograms};
pub use progress::{
    CategoryProgress, GenEdCode, GenEdProgress, GenEdRequirement, ProgressSnapshot,
    RequirementCourseProgress,
};
pub use schedule::{semester_id, PlannedCourse, Schedule, Semester};
pub use types::{
    CategoryStatus, CourseState, CreditLoad, ProgramType, RequirementCourseStatus,
    RequirementKind, RequirementType, Term,
};
