// ==========================================
// Course Planner - in-memory catalog
// ==========================================
// Immutable once built. Used by tests and by callers that already hold
// catalog data (e.g. a fetched JSON dump).
// ==========================================

use crate::catalog::catalog_reader::CatalogReader;
use crate::domain::course::{normalize_course_id, Course, CoursePrerequisites};
use crate::domain::program::{Program, RequirementCategory};
use crate::domain::progress::GenEdCode;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    courses: BTreeMap<String, Course>,
    prerequisites: HashMap<String, CoursePrerequisites>,
    programs: HashMap<String, Program>,
    requirements: HashMap<String, Vec<RequirementCategory>>,
    gen_ed: Vec<GenEdCode>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a course; a course without explicit prerequisite data gets none.
    pub fn with_course(mut self, mut course: Course) -> Self {
        let id = normalize_course_id(&course.course_id);
        course.course_id = id.clone();
        self.prerequisites
            .entry(id.clone())
            .or_insert_with(|| CoursePrerequisites::none(id.clone()));
        self.courses.insert(id, course);
        self
    }

    pub fn with_prerequisites(mut self, prereqs: CoursePrerequisites) -> Self {
        self.prerequisites
            .insert(normalize_course_id(&prereqs.course_id), prereqs);
        self
    }

    pub fn with_program(mut self, program: Program, categories: Vec<RequirementCategory>) -> Self {
        self.requirements
            .insert(program.program_id.clone(), categories);
        self.programs.insert(program.program_id.clone(), program);
        self
    }

    pub fn with_gen_ed(mut self, code: GenEdCode) -> Self {
        self.gen_ed.push(code);
        self
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn get_course(&self, course_id: &str) -> RepositoryResult<Option<Course>> {
        Ok(self.courses.get(&normalize_course_id(course_id)).cloned())
    }

    async fn get_course_prerequisites(
        &self,
        course_id: &str,
    ) -> RepositoryResult<Option<CoursePrerequisites>> {
        Ok(self
            .prerequisites
            .get(&normalize_course_id(course_id))
            .cloned())
    }

    async fn search_courses(&self, query: &str, limit: usize) -> RepositoryResult<Vec<Course>> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .courses
            .values()
            .filter(|c| {
                needle.is_empty()
                    || c.course_id.to_lowercase().contains(&needle)
                    || c.name.to_lowercase().contains(&needle)
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_program(&self, program_id: &str) -> RepositoryResult<Option<Program>> {
        Ok(self.programs.get(program_id).cloned())
    }

    async fn get_program_requirements(
        &self,
        program_id: &str,
    ) -> RepositoryResult<Vec<RequirementCategory>> {
        Ok(self.requirements.get(program_id).cloned().unwrap_or_default())
    }

    async fn get_gen_ed_catalog(&self) -> RepositoryResult<Vec<GenEdCode>> {
        Ok(self.gen_ed.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ProgramType;

    fn course(id: &str, name: &str) -> Course {
        Course {
            course_id: id.to_string(),
            name: name.to_string(),
            credits: Some("3".to_string()),
            department_code: "COMP".to_string(),
            gen_ed: None,
            description: None,
            grading_status: None,
        }
    }

    #[tokio::test]
    async fn test_lookup_is_canonical() {
        let catalog = InMemoryCatalog::new().with_course(course("comp 110", "Intro to Programming"));

        let found = catalog.get_course("COMP  110").await.unwrap();
        assert_eq!(found.unwrap().course_id, "COMP 110");

        let prereqs = catalog.get_course_prerequisites("Comp 110").await.unwrap();
        assert!(prereqs.unwrap().is_empty());

        assert!(catalog.get_course_prerequisites("COMP 999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_respects_limit() {
        let catalog = InMemoryCatalog::new()
            .with_course(course("COMP 110", "Intro to Programming"))
            .with_course(course("COMP 210", "Data Structures"))
            .with_course(course("MATH 231", "Calculus I"));

        let hits = catalog.search_courses("comp", 10).await.unwrap();
        assert_eq!(hits.len(), 2);

        let hits = catalog.search_courses("", 1).await.unwrap();
        assert_eq!(hits.len(), 1);

        let hits = catalog.search_courses("calculus", 10).await.unwrap();
        assert_eq!(hits[0].course_id, "MATH 231");
    }

    #[tokio::test]
    async fn test_unknown_program() {
        let catalog = InMemoryCatalog::new().with_program(
            Program::new("CS-BS", "Computer Science", ProgramType::Major, Some(120)),
            vec![],
        );
        assert!(catalog.get_program("CS-BS").await.unwrap().is_some());
        assert!(catalog.get_program("NOPE").await.unwrap().is_none());
        assert!(catalog.get_program_requirements("NOPE").await.unwrap().is_empty());
    }
}
