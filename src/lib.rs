// ==========================================
// Course Planner - core library
// ==========================================
// Multi-semester schedule planning with prerequisite checks,
// credit-load warnings and program / gen-ed progress.
// Stack: Rust + SQLite
// ==========================================

// ==========================================
// Modules
// ==========================================

// Domain - entities and closed enums
pub mod domain;

// Engine - planning rules
pub mod engine;

// Catalog read interface
pub mod catalog;

// Repository - data access
pub mod repository;

// Configuration
pub mod config;

// SQLite connection setup and schema
pub mod db;

// Logging
pub mod logging;

// API - service entry points
pub mod api;

// Application state wiring
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use domain::types::{CategoryStatus, CreditLoad, ProgramType, RequirementType, Term};

pub use domain::{
    Course, CoursePrerequisites, GenEdCode, GenEdProgress, PlannedCourse, PrerequisiteGroup,
    Program, ProgressSnapshot, RequirementCategory, RequirementCourse, Schedule, SelectedPrograms,
    Semester,
};

pub use engine::{
    CreditLoadValidator, GenEdTracker, PlannerOrchestrator, PlannerReport, PrerequisiteEvaluator,
    ProgramSelection, RequirementsAggregator, ScheduleCommand, ScheduleStore,
};

pub use catalog::{CatalogReader, InMemoryCatalog};

pub use api::{ApiError, ApiResult, PlannerApi};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Course Planner";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
