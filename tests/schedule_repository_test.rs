// ==========================================
// Schedule persistence integration tests
// ==========================================
// Covers: snapshot round-trip, revision checks, listing,
//         program selection storage, cascade delete
// ==========================================


use chrono::{Duration, TimeZone, Utc};
use course_planner::domain::program::{Program, SelectedPrograms};
use course_planner::domain::schedule::{PlannedCourse, Schedule};
use course_planner::domain::types::{ProgramType, Term};
use course_planner::repository::{
    ProgramSelectionRepository, RepositoryError, ScheduleRepository,
};
use test_helpers::{create_test_db, open_test_conn};

fn sample_schedule(id: &str, name: &str) -> Schedule {
    let now = Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap();
    let mut schedule = Schedule::with_semesters(id, name, Term::Fall, 2024, 2, now);
    let mut course = PlannedCourse::new("COMP 110", "Introduction to Programming", "3", "COMP");
    course.prereqs_met = Some(true);
    schedule.semesters[0].courses.push(course);
    schedule
}

#[test]
fn test_insert_and_find_round_trip() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let repo = ScheduleRepository::new(open_test_conn(&db_path).unwrap());

    let schedule = sample_schedule("s-1", "Plan A");
    let stored = repo.insert(&schedule).unwrap();
    assert_eq!(stored.revision, 1);

    let loaded = repo.find_by_id("s-1").unwrap().unwrap();
    assert_eq!(loaded.revision, 1);
    assert_eq!(loaded.schedule, schedule);
    assert_eq!(loaded.schedule.semesters[0].id, "fall-2024");
    assert_eq!(loaded.schedule.semesters[1].id, "spring-2025");
    assert_eq!(loaded.schedule.semesters[0].courses[0].prereqs_met, Some(true));

    assert!(repo.find_by_id("missing").unwrap().is_none());
}

#[test]
fn test_save_with_revision_bumps_revision() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let repo = ScheduleRepository::new(open_test_conn(&db_path).unwrap());

    let mut schedule = sample_schedule("s-1", "Plan A");
    repo.insert(&schedule).unwrap();

    schedule.name = "Plan A (revised)".to_string();
    schedule.updated_at = schedule.updated_at + Duration::minutes(5);
    let revision = repo.save_with_revision(&schedule, 1).unwrap();
    assert_eq!(revision, 2);

    let loaded = repo.find_by_id("s-1").unwrap().unwrap();
    assert_eq!(loaded.revision, 2);
    assert_eq!(loaded.schedule.name, "Plan A (revised)");
}

#[test]
fn test_stale_revision_is_rejected() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let repo = ScheduleRepository::new(open_test_conn(&db_path).unwrap());

    let schedule = sample_schedule("s-1", "Plan A");
    repo.insert(&schedule).unwrap();
    repo.save_with_revision(&schedule, 1).unwrap();

    // A second writer still holding revision 1
    let err = repo.save_with_revision(&schedule, 1).unwrap_err();
    match err {
        RepositoryError::OptimisticLockFailure {
            schedule_id,
            expected,
            actual,
        } => {
            assert_eq!(schedule_id, "s-1");
            assert_eq!(expected, 1);
            assert_eq!(actual, 2);
        }
        other => panic!("expected OptimisticLockFailure, got {:?}", other),
    }
}

#[test]
fn test_save_unknown_schedule_is_not_found() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let repo = ScheduleRepository::new(open_test_conn(&db_path).unwrap());

    let err = repo
        .save_with_revision(&sample_schedule("ghost", "Ghost"), 1)
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[test]
fn test_list_and_delete() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let repo = ScheduleRepository::new(open_test_conn(&db_path).unwrap());

    let first = sample_schedule("s-1", "Plan A");
    let mut second = sample_schedule("s-2", "Plan B");
    second.updated_at = second.updated_at + Duration::days(1);
    repo.insert(&first).unwrap();
    repo.insert(&second).unwrap();

    let entries = repo.list().unwrap();
    assert_eq!(entries.len(), 2);
    // most recently updated first
    assert_eq!(entries[0].schedule_id, "s-2");
    assert_eq!(entries[1].name, "Plan A");

    assert!(repo.delete("s-1").unwrap());
    assert!(!repo.delete("s-1").unwrap());
    assert_eq!(repo.list().unwrap().len(), 1);
}

#[test]
fn test_program_selection_persistence() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_conn(&db_path).unwrap();
    let schedules = ScheduleRepository::new(conn.clone());
    let selections = ProgramSelectionRepository::new(conn);

    schedules.insert(&sample_schedule("s-1", "Plan A")).unwrap();

    // nothing stored yet
    assert_eq!(selections.load("s-1").unwrap(), SelectedPrograms::default());

    let selected = SelectedPrograms {
        majors: vec![Program::new("CS-BS", "Computer Science, B.S.", ProgramType::Major, Some(120))],
        minors: vec![Program::new("MATH-MINOR", "Mathematics Minor", ProgramType::Minor, Some(15))],
    };
    selections.save("s-1", &selected).unwrap();
    assert_eq!(selections.load("s-1").unwrap(), selected);

    // upsert replaces
    let fewer = SelectedPrograms {
        majors: selected.majors.clone(),
        minors: Vec::new(),
    };
    selections.save("s-1", &fewer).unwrap();
    assert_eq!(selections.load("s-1").unwrap(), fewer);

    // selection goes with its schedule
    schedules.delete("s-1").unwrap();
    assert_eq!(selections.load("s-1").unwrap(), SelectedPrograms::default());
}
