// ==========================================
// PlannerApi end-to-end tests
// ==========================================
// Flow: seed catalog -> create schedule -> apply commands
//       -> select programs -> build report
// ==========================================


use course_planner::api::{ApiError, PlannerApi};
use course_planner::config::{config_keys, ConfigManager};
use course_planner::domain::schedule::PlannedCourse;
use course_planner::domain::types::{CategoryStatus, CreditLoad};
use course_planner::engine::{MutationOutcome, ScheduleCommand, SelectionOutcome};
use course_planner::repository::{ProgramSelectionRepository, ScheduleRepository, SqliteCatalog};
use std::sync::Arc;
use tempfile::NamedTempFile;
use test_helpers::{create_test_db, open_test_conn, sample_catalog};

type TestApi = PlannerApi<SqliteCatalog, ConfigManager>;

/// Seeded catalog and a Fall 2024 start with three semesters
fn setup_api() -> (NamedTempFile, TestApi, Arc<ConfigManager>) {
    course_planner::logging::init_test();

    let (temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_conn(&db_path).unwrap();

    let catalog = Arc::new(SqliteCatalog::new(conn.clone()));
    catalog.import_bundle(&sample_catalog()).unwrap();

    let config = Arc::new(ConfigManager::from_connection(conn.clone()).unwrap());
    config.set_global_config_value(config_keys::DEFAULT_START_TERM, "Fall").unwrap();
    config.set_global_config_value(config_keys::DEFAULT_START_YEAR, "2024").unwrap();
    config.set_global_config_value(config_keys::DEFAULT_SEMESTER_COUNT, "3").unwrap();

    let api = PlannerApi::new(
        Arc::new(ScheduleRepository::new(conn.clone())),
        Arc::new(ProgramSelectionRepository::new(conn)),
        catalog,
        config.clone(),
    );
    (temp_file, api, config)
}

#[tokio::test]
async fn test_create_schedule_uses_configured_defaults() {
    let (_temp_file, api, _config) = setup_api();

    let stored = api.create_schedule(None).await.unwrap();
    assert_eq!(stored.revision, 1);
    assert_eq!(stored.schedule.name, "My Schedule");

    let ids: Vec<&str> = stored.schedule.semesters.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["fall-2024", "spring-2025", "summer-i-2025"]);

    let named = api.create_schedule(Some("  Double Major  ")).await.unwrap();
    assert_eq!(named.schedule.name, "Double Major");

    assert_eq!(api.list_schedules().unwrap().len(), 2);
}

#[tokio::test]
async fn test_commands_advance_revision() {
    let (_temp_file, api, _config) = setup_api();
    let schedule_id = api.create_schedule(Some("Plan")).await.unwrap().schedule.id;

    let result = api
        .add_catalog_course(&schedule_id, 1, "fall-2024", "comp 110")
        .await
        .unwrap();
    assert_eq!(result.outcome, MutationOutcome::Applied);
    assert_eq!(result.schedule.revision, 2);
    assert_eq!(result.schedule.schedule.semesters[0].courses[0].course_id, "COMP 110");

    // duplicate in the same semester changes nothing
    let result = api
        .add_catalog_course(&schedule_id, 2, "fall-2024", "COMP 110")
        .await
        .unwrap();
    assert!(matches!(result.outcome, MutationOutcome::NoOp { .. }));
    assert_eq!(result.schedule.revision, 2);

    let command = ScheduleCommand::MoveCourse {
        from_semester_id: "fall-2024".to_string(),
        to_semester_id: "spring-2025".to_string(),
        course_id: "COMP 110".to_string(),
    };
    let result = api.apply_command(&schedule_id, 2, &command).await.unwrap();
    assert_eq!(result.outcome, MutationOutcome::Applied);
    assert_eq!(result.schedule.revision, 3);
    assert!(result.schedule.schedule.semesters[0].courses.is_empty());
    assert_eq!(result.schedule.schedule.semesters[1].courses.len(), 1);

    let command = ScheduleCommand::RemoveSemester {
        semester_id: "winter-2030".to_string(),
    };
    let result = api.apply_command(&schedule_id, 3, &command).await.unwrap();
    assert!(matches!(result.outcome, MutationOutcome::NotFound { .. }));
    assert_eq!(result.schedule.revision, 3);

    let stored = api.get_schedule(&schedule_id).unwrap();
    assert_eq!(stored.revision, 3);
    assert_eq!(stored.schedule.course_count(), 1);
}

#[tokio::test]
async fn test_stale_revision_is_rejected() {
    let (_temp_file, api, _config) = setup_api();
    let schedule_id = api.create_schedule(None).await.unwrap().schedule.id;

    api.apply_command(&schedule_id, 1, &ScheduleCommand::AddSemester)
        .await
        .unwrap();

    // second client still on revision 1
    let command = ScheduleCommand::AddCourse {
        semester_id: "fall-2024".to_string(),
        course: PlannedCourse::new("COMP 110", "Introduction to Programming", "3", "COMP"),
    };
    let err = api.apply_command(&schedule_id, 1, &command).await.unwrap_err();
    assert!(matches!(err, ApiError::OptimisticLockFailure(_)));

    let stored = api.get_schedule(&schedule_id).unwrap();
    assert_eq!(stored.revision, 2);
    assert_eq!(stored.schedule.semesters.len(), 4);
    assert_eq!(stored.schedule.course_count(), 0);
}

#[tokio::test]
async fn test_unknown_entities_are_not_found() {
    let (_temp_file, api, _config) = setup_api();
    let schedule_id = api.create_schedule(None).await.unwrap().schedule.id;

    let err = api
        .add_catalog_course(&schedule_id, 1, "fall-2024", "COMP 999")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = api.add_program(&schedule_id, "NOPE").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = api
        .apply_command("missing", 1, &ScheduleCommand::AddSemester)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    api.delete_schedule(&schedule_id).unwrap();
    assert!(matches!(api.get_schedule(&schedule_id), Err(ApiError::NotFound(_))));
    assert!(matches!(api.delete_schedule(&schedule_id), Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_program_selection_caps() {
    let (_temp_file, api, _config) = setup_api();
    let schedule_id = api.create_schedule(None).await.unwrap().schedule.id;

    for program_id in ["CS-BS", "PHYS-BS", "MATH-MINOR"] {
        let result = api.add_program(&schedule_id, program_id).await.unwrap();
        assert!(result.outcome.is_accepted(), "{} should be accepted", program_id);
    }

    let result = api.add_program(&schedule_id, "DATA-CERT").await.unwrap();
    assert_eq!(
        result.outcome,
        SelectionOutcome::Rejected("Maximum 3 programs allowed (majors + minors)".to_string())
    );
    assert_eq!(api.get_selected_programs(&schedule_id).unwrap().total(), 3);

    let selected = api.remove_program(&schedule_id, "PHYS-BS").unwrap();
    assert_eq!(selected.majors.len(), 1);

    let result = api.add_program(&schedule_id, "CS-BS").await.unwrap();
    assert_eq!(result.outcome.rejection_reason(), Some("Program already added"));

    // certificates are counted with minors
    let result = api.add_program(&schedule_id, "DATA-CERT").await.unwrap();
    assert!(result.outcome.is_accepted());
    let selected = api.get_selected_programs(&schedule_id).unwrap();
    assert_eq!(selected.minors.len(), 2);
    assert_eq!(selected.majors.len(), 1);

    // removing an unselected program is a no-op
    let unchanged = api.remove_program(&schedule_id, "PHYS-BS").unwrap();
    assert_eq!(unchanged, selected);
}

#[tokio::test]
async fn test_check_course() {
    let (_temp_file, api, _config) = setup_api();
    let schedule_id = api.create_schedule(None).await.unwrap().schedule.id;
    api.add_catalog_course(&schedule_id, 1, "fall-2024", "COMP 110")
        .await
        .unwrap();
    api.add_catalog_course(&schedule_id, 2, "spring-2025", "COMP 210")
        .await
        .unwrap();

    let check = api
        .check_course(&schedule_id, "spring-2025", "COMP 210")
        .await
        .unwrap();
    assert!(check.satisfied);

    // same-semester prerequisite does not count
    let check = api
        .check_course(&schedule_id, "spring-2025", "COMP 455")
        .await
        .unwrap();
    assert!(!check.satisfied);
    assert_eq!(check.unmet_groups.len(), 2);

    let check = api
        .check_course(&schedule_id, "summer-i-2025", "COMP 455")
        .await
        .unwrap();
    assert!(!check.satisfied);
    assert_eq!(check.missing_course_ids(), vec!["MATH 381".to_string()]);

    let check = api
        .check_course(&schedule_id, "summer-i-2025", "ZZZ 100")
        .await
        .unwrap();
    assert!(!check.satisfied);
    assert!(check.data_unavailable);

    let err = api
        .check_course(&schedule_id, "fall-1999", "COMP 210")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_full_report() {
    let (_temp_file, api, _config) = setup_api();
    let schedule_id = api.create_schedule(Some("Plan")).await.unwrap().schedule.id;

    api.add_catalog_course(&schedule_id, 1, "fall-2024", "COMP 110")
        .await
        .unwrap();
    api.add_catalog_course(&schedule_id, 2, "spring-2025", "COMP 210")
        .await
        .unwrap();
    api.add_catalog_course(&schedule_id, 3, "spring-2025", "COMP 211")
        .await
        .unwrap();
    api.add_program(&schedule_id, "CS-BS").await.unwrap();

    let report = api.get_report(&schedule_id, Some("spring-2025")).await.unwrap();

    // prerequisites
    assert_eq!(report.prerequisite_checks.len(), 3);
    assert_eq!(report.unmet_prerequisite_count(), 1);
    let spring = &report.schedule.semesters[1];
    let comp_210 = spring.courses.iter().find(|c| c.course_id == "COMP 210").unwrap();
    let comp_211 = spring.courses.iter().find(|c| c.course_id == "COMP 211").unwrap();
    assert_eq!(comp_210.prereqs_met, Some(true));
    assert_eq!(comp_211.prereqs_met, Some(false));
    assert_eq!(comp_211.warnings.as_ref().map(Vec::len), Some(2));

    // credit load
    assert_eq!(report.semesters.len(), 3);
    assert_eq!(report.semesters[0].total_credits, 3);
    assert_eq!(report.semesters[0].load, CreditLoad::Underload);
    assert_eq!(report.semesters[2].total_credits, 0);

    // completed / planned split
    assert_eq!(report.completed_course_ids, vec!["COMP 110".to_string()]);
    assert_eq!(
        report.planned_course_ids,
        vec!["COMP 210".to_string(), "COMP 211".to_string()]
    );

    // program progress
    assert_eq!(report.programs.len(), 1);
    let cs = &report.programs[0];
    assert_eq!(cs.completed_credits, 3);
    assert_eq!(cs.planned_credits, 6);
    assert_eq!(cs.total_required_credits, 120);
    assert!((cs.completion_percentage - 2.5).abs() < 1e-9);
    assert_eq!(cs.requirements[0].status, CategoryStatus::InProgress);
    assert_eq!(cs.requirements[0].required_count, 3);
    assert_eq!(cs.requirements[1].status, CategoryStatus::NotStarted);

    // gen-ed
    assert_eq!(report.gen_ed.total_count, 2);
    assert_eq!(report.gen_ed.completed_count, 1);
    let quant = report
        .gen_ed
        .requirements
        .iter()
        .find(|r| r.code == "FC-QUANT")
        .unwrap();
    assert!(quant.fulfilled);
    assert_eq!(quant.courses_taken, vec!["COMP 110".to_string()]);
}

#[tokio::test]
async fn test_search_respects_configured_limit() {
    let (_temp_file, api, config) = setup_api();

    assert_eq!(api.search_courses("COMP").await.unwrap().len(), 5);
    assert_eq!(api.search_courses("math").await.unwrap().len(), 4);

    config.set_global_config_value(config_keys::SEARCH_LIMIT, "2").unwrap();
    let results = api.search_courses("COMP").await.unwrap();
    let ids: Vec<&str> = results.iter().map(|c| c.course_id.as_str()).collect();
    assert_eq!(ids, vec!["COMP 110", "COMP 210"]);
}
