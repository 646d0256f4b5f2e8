// ==========================================
// ScheduleStore property tests
// ==========================================
// Randomized command sequences against the store's invariants.
// ==========================================

use chrono::{TimeZone, Utc};
use course_planner::domain::schedule::{PlannedCourse, Schedule};
use course_planner::domain::types::Term;
use course_planner::engine::{CreditLoadValidator, ScheduleDefaults, ScheduleStore};
use proptest::prelude::*;
use std::collections::HashSet;

fn fixed_clock() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap()
}

fn store() -> ScheduleStore {
    ScheduleStore::new(ScheduleDefaults {
        name: "Prop".to_string(),
        start_term: Term::Fall,
        start_year: 2024,
        semester_count: 4,
    })
    .with_clock(fixed_clock)
}

fn term_strategy() -> impl Strategy<Value = Term> {
    prop_oneof![
        Just(Term::Fall),
        Just(Term::Spring),
        Just(Term::SummerI),
        Just(Term::SummerII),
    ]
}

/// Four-semester schedule holding `placements` as (semester index, course number, credits)
fn schedule_with(placements: &[(usize, u16, u8)]) -> Schedule {
    let store = store();
    let mut schedule = store.create_schedule(None);
    for &(semester, number, credits) in placements {
        let semester_id = schedule.semesters[semester % 4].id.clone();
        let course = PlannedCourse::new(
            format!("COMP {}", 100 + number),
            "Generated",
            credits.to_string(),
            "COMP",
        );
        schedule = store.add_course(&schedule, &semester_id, course).schedule;
    }
    schedule
}

fn placements() -> impl Strategy<Value = Vec<(usize, u16, u8)>> {
    prop::collection::vec((0usize..4, 0u16..30, 0u8..6), 0..25)
}

proptest! {
    /// Four successor steps return to the same term one year later.
    #[test]
    fn prop_term_cycle_wraps_one_year(term in term_strategy(), year in 1900i32..2200) {
        let mut current = (term, year);
        for _ in 0..4 {
            current = current.0.successor(current.1);
        }
        prop_assert_eq!(current, (term, year + 1));
    }

    /// A semester never holds the same course id twice.
    #[test]
    fn prop_no_duplicates_within_semester(placements in placements()) {
        let schedule = schedule_with(&placements);
        for semester in &schedule.semesters {
            let unique: HashSet<&str> = semester.courses.iter().map(|c| c.course_id.as_str()).collect();
            prop_assert_eq!(unique.len(), semester.courses.len());
        }
    }

    /// Moving a course never changes the total course count.
    #[test]
    fn prop_move_conserves_course_count(
        placements in placements(),
        pick in any::<prop::sample::Index>(),
        to in 0usize..4,
    ) {
        let schedule = schedule_with(&placements);
        let ids = schedule.all_course_ids();
        prop_assume!(!ids.is_empty());

        let course_id = pick.get(&ids).clone();
        let from = schedule
            .semesters
            .iter()
            .find(|s| s.contains_course(&course_id))
            .map(|s| s.id.clone())
            .unwrap();
        let to = schedule.semesters[to].id.clone();

        let mutation = store().move_course(&schedule, &from, &to, &course_id);
        prop_assert_eq!(mutation.schedule.course_count(), schedule.course_count());
        if mutation.is_applied() {
            prop_assert!(!mutation.schedule.find_semester(&from).unwrap().contains_course(&course_id));
            prop_assert!(mutation.schedule.find_semester(&to).unwrap().contains_course(&course_id));
        } else {
            prop_assert_eq!(&mutation.schedule, &schedule);
        }
    }

    /// Removing a course twice leaves the same state as removing it once.
    #[test]
    fn prop_remove_course_is_idempotent(placements in placements(), pick in any::<prop::sample::Index>()) {
        let schedule = schedule_with(&placements);
        let ids = schedule.all_course_ids();
        prop_assume!(!ids.is_empty());

        let course_id = pick.get(&ids).clone();
        let semester_id = schedule
            .semesters
            .iter()
            .find(|s| s.contains_course(&course_id))
            .map(|s| s.id.clone())
            .unwrap();

        let store = store();
        let once = store.remove_course(&schedule, &semester_id, &course_id);
        prop_assert!(once.is_applied());
        let twice = store.remove_course(&once.schedule, &semester_id, &course_id);
        prop_assert!(!twice.is_applied());
        prop_assert_eq!(&twice.schedule, &once.schedule);
    }

    /// Semester summaries agree with the store's credit totals.
    #[test]
    fn prop_summary_matches_total_credits(placements in placements()) {
        let schedule = schedule_with(&placements);
        let store = store();
        for summary in CreditLoadValidator::summarize(&schedule) {
            prop_assert_eq!(summary.total_credits, store.get_total_credits(&schedule, &summary.semester_id));
            prop_assert_eq!(summary.load, CreditLoadValidator::classify(summary.total_credits));
        }
    }
}
