// ==========================================
// Course Planner - SQLite catalog
// ==========================================
// Tables: course, course_prerequisite, program, requirement_category,
//         requirement_course, gen_ed_code, gen_ed_course
// Reads implement CatalogReader; writes are ingestion helpers used
// when loading a catalog dump.
// ==========================================

use crate::catalog::CatalogReader;
use crate::domain::course::{normalize_course_id, Course, CoursePrerequisites, CourseRef, PrerequisiteGroup};
use crate::domain::program::{Program, RequirementCategory, RequirementCourse};
use crate::domain::progress::GenEdCode;
use crate::domain::types::{ProgramType, RequirementType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

// ==========================================
// CatalogBundle - JSON dump shape for bulk import
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogBundle {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub prerequisites: Vec<CoursePrerequisites>,
    #[serde(default)]
    pub programs: Vec<ProgramBundle>,
    #[serde(default)]
    pub gen_ed: Vec<GenEdCode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramBundle {
    pub program: Program,
    #[serde(default)]
    pub categories: Vec<RequirementCategory>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub courses: usize,
    pub prerequisite_groups: usize,
    pub programs: usize,
    pub categories: usize,
    pub gen_ed_codes: usize,
}

// ==========================================
// SqliteCatalog
// ==========================================
pub struct SqliteCatalog {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCatalog {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ===== ingestion =====

    pub fn upsert_course(&self, course: &Course) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        upsert_course_on(&conn, course)
    }

    pub fn insert_prerequisite_group(
        &self,
        course_id: &str,
        group: &PrerequisiteGroup,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        insert_prerequisite_group_on(&conn, course_id, group)
    }

    pub fn upsert_program(&self, program: &Program) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        upsert_program_on(&conn, program)
    }

    /// Appends a category (and its courses) after the program's existing ones.
    ///
    /// # Returns
    /// - Ok(category_id)
    pub fn insert_requirement_category(&self, category: &RequirementCategory) -> RepositoryResult<i64> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let id = insert_requirement_category_tx(&tx, category)?;
        tx.commit()?;
        Ok(id)
    }

    pub fn upsert_gen_ed_code(&self, code: &GenEdCode) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        upsert_gen_ed_code_tx(&tx, code)?;
        tx.commit()?;
        Ok(())
    }

    /// Loads a whole catalog dump in one transaction.
    ///
    /// Programs present in the bundle have their categories replaced.
    pub fn import_bundle(&self, bundle: &CatalogBundle) -> RepositoryResult<ImportSummary> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let mut summary = ImportSummary::default();

        for course in &bundle.courses {
            upsert_course_on(&tx, course)?;
            summary.courses += 1;
        }

        for prereqs in &bundle.prerequisites {
            let course_id = normalize_course_id(&prereqs.course_id);
            tx.execute(
                "DELETE FROM course_prerequisite WHERE course_id = ?",
                params![&course_id],
            )?;
            for group in prereqs
                .prerequisite_groups
                .iter()
                .chain(prereqs.corequisite_groups.iter())
            {
                insert_prerequisite_group_on(&tx, &course_id, group)?;
                summary.prerequisite_groups += 1;
            }
        }

        for entry in &bundle.programs {
            upsert_program_on(&tx, &entry.program)?;
            tx.execute(
                "DELETE FROM requirement_category WHERE program_id = ?",
                params![&entry.program.program_id],
            )?;
            for category in &entry.categories {
                let mut category = category.clone();
                category.program_id = entry.program.program_id.clone();
                insert_requirement_category_tx(&tx, &category)?;
                summary.categories += 1;
            }
            summary.programs += 1;
        }

        for code in &bundle.gen_ed {
            upsert_gen_ed_code_tx(&tx, code)?;
            summary.gen_ed_codes += 1;
        }

        tx.commit()?;

        tracing::info!(
            courses = summary.courses,
            prerequisite_groups = summary.prerequisite_groups,
            programs = summary.programs,
            categories = summary.categories,
            gen_ed_codes = summary.gen_ed_codes,
            "catalog imported"
        );
        Ok(summary)
    }

    // ===== reads (sync) =====

    fn find_course(&self, course_id: &str) -> RepositoryResult<Option<Course>> {
        let conn = self.get_conn()?;
        let course = conn
            .query_row(
                r#"SELECT course_id, name, credits, department_code, gen_ed_json,
                          description, grading_status
                   FROM course WHERE course_id = ?"#,
                params![normalize_course_id(course_id)],
                map_course_row,
            )
            .optional()?;

        course.map(decode_course).transpose()
    }

    fn find_prerequisites(&self, course_id: &str) -> RepositoryResult<Option<CoursePrerequisites>> {
        let course_id = normalize_course_id(course_id);
        let conn = self.get_conn()?;

        let known: bool = conn
            .query_row(
                "SELECT 1 FROM course WHERE course_id = ?",
                params![&course_id],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        let mut stmt = conn.prepare(
            r#"SELECT prereq_group, is_corequisite, required_course_id, required_course_name
               FROM course_prerequisite
               WHERE course_id = ?
               ORDER BY prereq_group, seq, required_course_id"#,
        )?;
        let rows = stmt
            .query_map(params![&course_id], |row| {
                Ok((
                    row.get::<_, i32>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if !known && rows.is_empty() {
            return Ok(None);
        }

        let mut groups: Vec<PrerequisiteGroup> = Vec::new();
        for (index, is_corequisite, required_id, required_name) in rows {
            let course = CourseRef::new(required_id, required_name);
            match groups.last_mut() {
                Some(group) if group.prereq_group == index => group.courses.push(course),
                _ => groups.push(PrerequisiteGroup::new(index, is_corequisite, vec![course])),
            }
        }

        Ok(Some(CoursePrerequisites::from_groups(course_id, groups)))
    }

    fn search(&self, query: &str, limit: usize) -> RepositoryResult<Vec<Course>> {
        let pattern = format!("%{}%", query.trim().to_lowercase());
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT course_id, name, credits, department_code, gen_ed_json,
                      description, grading_status
               FROM course
               WHERE lower(course_id) LIKE ?1 OR lower(name) LIKE ?1
               ORDER BY course_id
               LIMIT ?2"#,
        )?;

        let rows = stmt
            .query_map(params![pattern, limit as i64], map_course_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(decode_course).collect()
    }

    fn find_program(&self, program_id: &str) -> RepositoryResult<Option<Program>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                r#"SELECT program_id, name, program_type, degree_type, total_hours, url
                   FROM program WHERE program_id = ?"#,
                params![program_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, Option<u32>>(4)?,
                        row.get::<_, Option<String>>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((program_id, name, raw_type, degree_type, total_hours, url)) = row else {
            return Ok(None);
        };

        let program_type = ProgramType::parse(&raw_type).ok_or_else(|| RepositoryError::FieldValueError {
            field: "program_type".to_string(),
            message: format!("unknown program type '{}' for {}", raw_type, program_id),
        })?;

        Ok(Some(Program {
            program_id,
            name,
            program_type,
            degree_type,
            total_hours,
            url,
        }))
    }

    fn find_requirements(&self, program_id: &str) -> RepositoryResult<Vec<RequirementCategory>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT id, program_id, requirement_type, category_name, min_credits, min_courses,
                      selection_notes, level_requirement, other_restrictions
               FROM requirement_category
               WHERE program_id = ?
               ORDER BY seq, id"#,
        )?;
        let mut categories = stmt
            .query_map(params![program_id], |row| {
                Ok(RequirementCategory {
                    id: row.get(0)?,
                    program_id: row.get(1)?,
                    requirement_type: RequirementType::parse(&row.get::<_, String>(2)?),
                    category_name: row.get(3)?,
                    min_credits: row.get(4)?,
                    min_courses: row.get(5)?,
                    selection_notes: row.get(6)?,
                    level_requirement: row.get(7)?,
                    other_restrictions: row.get(8)?,
                    courses: Vec::new(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut course_stmt = conn.prepare(
            r#"SELECT course_id, course_name, credits, is_required
               FROM requirement_course
               WHERE category_id = ?
               ORDER BY seq, course_id"#,
        )?;
        for category in categories.iter_mut() {
            category.courses = course_stmt
                .query_map(params![category.id], |row| {
                    Ok(RequirementCourse {
                        course_id: row.get(0)?,
                        course_name: row.get(1)?,
                        credits: row.get(2)?,
                        is_required: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
        }

        Ok(categories)
    }

    fn find_gen_ed(&self) -> RepositoryResult<Vec<GenEdCode>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare("SELECT code, name, description FROM gen_ed_code ORDER BY seq, code")?;
        let mut codes = stmt
            .query_map([], |row| {
                Ok(GenEdCode {
                    code: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    eligible_course_ids: Vec::new(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut course_stmt =
            conn.prepare("SELECT course_id FROM gen_ed_course WHERE code = ? ORDER BY seq, course_id")?;
        for code in codes.iter_mut() {
            code.eligible_course_ids = course_stmt
                .query_map(params![&code.code], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
        }

        Ok(codes)
    }
}

#[async_trait]
impl CatalogReader for SqliteCatalog {
    async fn get_course(&self, course_id: &str) -> RepositoryResult<Option<Course>> {
        self.find_course(course_id)
    }

    async fn get_course_prerequisites(
        &self,
        course_id: &str,
    ) -> RepositoryResult<Option<CoursePrerequisites>> {
        self.find_prerequisites(course_id)
    }

    async fn search_courses(&self, query: &str, limit: usize) -> RepositoryResult<Vec<Course>> {
        self.search(query, limit)
    }

    async fn get_program(&self, program_id: &str) -> RepositoryResult<Option<Program>> {
        self.find_program(program_id)
    }

    async fn get_program_requirements(
        &self,
        program_id: &str,
    ) -> RepositoryResult<Vec<RequirementCategory>> {
        self.find_requirements(program_id)
    }

    async fn get_gen_ed_catalog(&self) -> RepositoryResult<Vec<GenEdCode>> {
        self.find_gen_ed()
    }
}

// ==========================================
// Row helpers
// ==========================================

type CourseRow = (
    String,
    String,
    Option<String>,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn map_course_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CourseRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn decode_course(row: CourseRow) -> RepositoryResult<Course> {
    let (course_id, name, credits, department_code, gen_ed_json, description, grading_status) = row;
    let gen_ed = match gen_ed_json {
        Some(json) => Some(serde_json::from_str(&json)?),
        None => None,
    };
    Ok(Course {
        course_id,
        name,
        credits,
        department_code,
        gen_ed,
        description,
        grading_status,
    })
}

fn upsert_course_on(conn: &Connection, course: &Course) -> RepositoryResult<()> {
    let gen_ed_json = course.gen_ed.as_ref().map(serde_json::to_string).transpose()?;
    conn.execute(
        r#"INSERT OR REPLACE INTO course (
            course_id, name, credits, department_code, gen_ed_json, description, grading_status
        ) VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        params![
            normalize_course_id(&course.course_id),
            &course.name,
            &course.credits,
            &course.department_code,
            gen_ed_json,
            &course.description,
            &course.grading_status,
        ],
    )?;
    Ok(())
}

fn insert_prerequisite_group_on(
    conn: &Connection,
    course_id: &str,
    group: &PrerequisiteGroup,
) -> RepositoryResult<()> {
    let course_id = normalize_course_id(course_id);
    for (seq, required) in group.courses.iter().enumerate() {
        conn.execute(
            r#"INSERT OR REPLACE INTO course_prerequisite (
                course_id, prereq_group, is_corequisite, required_course_id,
                required_course_name, seq
            ) VALUES (?, ?, ?, ?, ?, ?)"#,
            params![
                &course_id,
                group.prereq_group,
                group.is_corequisite,
                normalize_course_id(&required.course_id),
                &required.name,
                seq as i64,
            ],
        )?;
    }
    Ok(())
}

fn upsert_program_on(conn: &Connection, program: &Program) -> RepositoryResult<()> {
    conn.execute(
        r#"INSERT INTO program (program_id, name, program_type, degree_type, total_hours, url)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT(program_id) DO UPDATE SET
               name = ?2, program_type = ?3, degree_type = ?4, total_hours = ?5, url = ?6"#,
        params![
            &program.program_id,
            &program.name,
            program.program_type.as_str(),
            &program.degree_type,
            program.total_hours,
            &program.url,
        ],
    )?;
    Ok(())
}

fn insert_requirement_category_tx(tx: &Transaction, category: &RequirementCategory) -> RepositoryResult<i64> {
    let seq: i64 = tx.query_row(
        "SELECT COUNT(*) FROM requirement_category WHERE program_id = ?",
        params![&category.program_id],
        |row| row.get(0),
    )?;

    tx.execute(
        r#"INSERT INTO requirement_category (
            program_id, requirement_type, category_name, min_credits, min_courses,
            selection_notes, level_requirement, other_restrictions, seq
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        params![
            &category.program_id,
            category.requirement_type.as_str(),
            &category.category_name,
            category.min_credits,
            category.min_courses,
            &category.selection_notes,
            &category.level_requirement,
            &category.other_restrictions,
            seq,
        ],
    )?;
    let category_id = tx.last_insert_rowid();

    for (seq, course) in category.courses.iter().enumerate() {
        tx.execute(
            r#"INSERT OR REPLACE INTO requirement_course (
                category_id, course_id, course_name, credits, is_required, seq
            ) VALUES (?, ?, ?, ?, ?, ?)"#,
            params![
                category_id,
                normalize_course_id(&course.course_id),
                &course.course_name,
                &course.credits,
                course.is_required,
                seq as i64,
            ],
        )?;
    }

    Ok(category_id)
}

fn upsert_gen_ed_code_tx(tx: &Transaction, code: &GenEdCode) -> RepositoryResult<()> {
    // new codes go after the existing ones; re-imported codes keep their slot
    let next_seq: i64 = tx.query_row("SELECT COUNT(*) FROM gen_ed_code", [], |row| row.get(0))?;

    tx.execute(
        r#"INSERT INTO gen_ed_code (code, name, description, seq)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(code) DO UPDATE SET name = ?2, description = ?3"#,
        params![&code.code, &code.name, &code.description, next_seq],
    )?;
    tx.execute("DELETE FROM gen_ed_course WHERE code = ?", params![&code.code])?;
    for (seq, course_id) in code.eligible_course_ids.iter().enumerate() {
        tx.execute(
            "INSERT OR IGNORE INTO gen_ed_course (code, course_id, seq) VALUES (?, ?, ?)",
            params![&code.code, normalize_course_id(course_id), seq as i64],
        )?;
    }
    Ok(())
}
