// ==========================================
// SQLite catalog integration tests
// ==========================================
// Covers: bundle import, prerequisite grouping, search,
//         program requirements, gen-ed ordering
// ==========================================


use course_planner::catalog::CatalogReader;
use course_planner::domain::types::{ProgramType, RequirementType};
use course_planner::repository::SqliteCatalog;
use test_helpers::{create_test_db, open_test_conn, sample_catalog};

fn seeded_catalog() -> (tempfile::NamedTempFile, SqliteCatalog) {
    let (temp_file, db_path) = create_test_db().unwrap();
    let catalog = SqliteCatalog::new(open_test_conn(&db_path).unwrap());
    catalog.import_bundle(&sample_catalog()).unwrap();
    (temp_file, catalog)
}

#[test]
fn test_import_bundle_summary() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let catalog = SqliteCatalog::new(open_test_conn(&db_path).unwrap());

    let summary = catalog.import_bundle(&sample_catalog()).unwrap();
    assert_eq!(summary.courses, 12);
    assert_eq!(summary.prerequisite_groups, 5);
    assert_eq!(summary.programs, 4);
    assert_eq!(summary.categories, 3);
    assert_eq!(summary.gen_ed_codes, 2);
}

#[test]
fn test_reimport_replaces_groups_and_categories() {
    let (_temp_file, catalog) = seeded_catalog();
    catalog.import_bundle(&sample_catalog()).unwrap();

    let rt = tokio::runtime::Runtime::new().unwrap();
    let prereqs = rt
        .block_on(catalog.get_course_prerequisites("COMP 211"))
        .unwrap()
        .unwrap();
    assert_eq!(prereqs.prerequisite_groups.len(), 2);

    let categories = rt.block_on(catalog.get_program_requirements("CS-BS")).unwrap();
    assert_eq!(categories.len(), 2);
}

#[tokio::test]
async fn test_get_course_normalizes_id() {
    let (_temp_file, catalog) = seeded_catalog();

    let course = catalog.get_course("  comp   110 ").await.unwrap().unwrap();
    assert_eq!(course.course_id, "COMP 110");
    assert_eq!(course.credits.as_deref(), Some("3"));
    assert_eq!(course.department_code, "COMP");

    assert!(catalog.get_course("COMP 999").await.unwrap().is_none());
}

#[tokio::test]
async fn test_prerequisite_groups_are_split() {
    let (_temp_file, catalog) = seeded_catalog();

    let prereqs = catalog.get_course_prerequisites("COMP 211").await.unwrap().unwrap();
    assert_eq!(prereqs.prerequisite_groups.len(), 2);
    assert!(prereqs.corequisite_groups.is_empty());

    let calculus = &prereqs.prerequisite_groups[1];
    let ids: Vec<String> = calculus.course_ids().collect();
    assert_eq!(ids, vec!["MATH 231".to_string(), "MATH 241".to_string()]);

    let prereqs = catalog.get_course_prerequisites("COMP 455").await.unwrap().unwrap();
    assert_eq!(prereqs.prerequisite_groups.len(), 1);
    assert_eq!(prereqs.corequisite_groups.len(), 1);
    assert!(prereqs.corequisite_groups[0].is_corequisite);
}

#[tokio::test]
async fn test_prerequisites_known_course_without_groups() {
    let (_temp_file, catalog) = seeded_catalog();

    // Known course, no rows: empty but present
    let prereqs = catalog.get_course_prerequisites("COMP 110").await.unwrap().unwrap();
    assert!(prereqs.is_empty());

    // Unknown course: no data at all
    assert!(catalog.get_course_prerequisites("ZZZ 100").await.unwrap().is_none());
}

#[tokio::test]
async fn test_search_courses() {
    let (_temp_file, catalog) = seeded_catalog();

    let results = catalog.search_courses("comp", 10).await.unwrap();
    let ids: Vec<&str> = results.iter().map(|c| c.course_id.as_str()).collect();
    assert_eq!(ids, vec!["COMP 110", "COMP 210", "COMP 211", "COMP 455", "COMP 590"]);

    let results = catalog.search_courses("calculus", 10).await.unwrap();
    assert_eq!(results.len(), 4);

    let results = catalog.search_courses("comp", 2).await.unwrap();
    assert_eq!(results.len(), 2);

    let results = catalog.search_courses("no such course", 10).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_program_and_requirements() {
    let (_temp_file, catalog) = seeded_catalog();

    let program = catalog.get_program("CS-BS").await.unwrap().unwrap();
    assert_eq!(program.program_type, ProgramType::Major);
    assert_eq!(program.total_hours, Some(120));

    let certificate = catalog.get_program("DATA-CERT").await.unwrap().unwrap();
    assert_eq!(certificate.program_type, ProgramType::Certificate);
    assert_eq!(certificate.total_hours, None);

    assert!(catalog.get_program("NOPE").await.unwrap().is_none());

    let categories = catalog.get_program_requirements("CS-BS").await.unwrap();
    assert_eq!(categories[0].requirement_type, RequirementType::Core);
    assert_eq!(categories[0].min_credits, Some(9));
    assert_eq!(categories[0].courses.len(), 3);
    assert_eq!(categories[1].requirement_type, RequirementType::Elective);
    assert_eq!(categories[1].min_courses, Some(1));
    assert!(categories[1].courses.iter().all(|c| !c.is_required));

    assert!(catalog.get_program_requirements("NOPE").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_gen_ed_keeps_catalog_order() {
    let (_temp_file, catalog) = seeded_catalog();

    let codes = catalog.get_gen_ed_catalog().await.unwrap();
    assert_eq!(codes.len(), 2);

    let knowing = codes.iter().find(|c| c.code == "FC-KNOWING").unwrap();
    assert_eq!(knowing.eligible_course_ids, vec!["HIST 127", "ENGL 105"]);
}
