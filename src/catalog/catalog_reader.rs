// ==========================================
// Course Planner - catalog read interface
// ==========================================
// The engine never talks to storage directly; the orchestrator fetches
// through this trait and hands plain values to the engine.
// Implementors: InMemoryCatalog, SqliteCatalog
// ==========================================

use crate::domain::course::{Course, CoursePrerequisites};
use crate::domain::program::{Program, RequirementCategory};
use crate::domain::progress::GenEdCode;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Look up a course by id (any casing/spacing).
    ///
    /// # Returns
    /// - Ok(None): unknown course
    async fn get_course(&self, course_id: &str) -> RepositoryResult<Option<Course>>;

    /// Prerequisite and corequisite groups of a course.
    ///
    /// # Returns
    /// - Ok(Some(..)) with empty lists: course known, no requirements
    /// - Ok(None): no data for the course; callers must fail closed
    async fn get_course_prerequisites(
        &self,
        course_id: &str,
    ) -> RepositoryResult<Option<CoursePrerequisites>>;

    /// Case-insensitive match on id or name, at most `limit` results.
    async fn search_courses(&self, query: &str, limit: usize) -> RepositoryResult<Vec<Course>>;

    async fn get_program(&self, program_id: &str) -> RepositoryResult<Option<Program>>;

    /// Categories in catalog order; empty for an unknown program.
    async fn get_program_requirements(
        &self,
        program_id: &str,
    ) -> RepositoryResult<Vec<RequirementCategory>>;

    async fn get_gen_ed_catalog(&self) -> RepositoryResult<Vec<GenEdCode>>;
}
