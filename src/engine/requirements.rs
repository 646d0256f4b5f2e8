// ==========================================
// Course Planner - RequirementsAggregator
// ==========================================
// Input:  program + requirement categories + completed / planned id sets
// Output: ProgressSnapshot (per category and per program)
// ==========================================
// Rules:
// - completed_count: entries whose course is completed
// - planned_count:   entries planned and not completed
// - required_count:  min_courses if set, else number of required entries
// - credits summed over every entry of every category (no dedup),
//   saturating at u32::MAX
// - percentage uses the program's declared total_hours
// - a course counts toward every program/category that lists it
// ==========================================

use crate::domain::course::{nominal_credits, normalize_course_id};
use crate::domain::program::{Program, RequirementCategory};
use crate::domain::progress::{CategoryProgress, ProgressSnapshot, RequirementCourseProgress};
use crate::domain::types::CategoryStatus;
use std::collections::HashSet;

pub struct RequirementsAggregator;

impl RequirementsAggregator {
    pub fn compute_progress(
        program: &Program,
        categories: &[RequirementCategory],
        completed_ids: &HashSet<String>,
        planned_ids: &HashSet<String>,
    ) -> ProgressSnapshot {
        let mut completed_credits = 0u32;
        let mut planned_credits = 0u32;
        let mut requirements = Vec::with_capacity(categories.len());

        for category in categories {
            let progress = Self::compute_category(category, completed_ids, planned_ids);

            for course in &progress.courses {
                let credits = nominal_credits(course.course.credits.as_deref().unwrap_or(""));
                if course.is_completed {
                    completed_credits = completed_credits.saturating_add(credits);
                } else if course.is_planned {
                    planned_credits = planned_credits.saturating_add(credits);
                }
            }

            requirements.push(progress);
        }

        let total_required_credits = program.total_hours.unwrap_or(0);
        let completion_percentage = completion_percentage(completed_credits, total_required_credits);

        tracing::debug!(
            program_id = %program.program_id,
            completed_credits,
            planned_credits,
            total_required_credits,
            "program progress computed"
        );

        ProgressSnapshot {
            program: program.clone(),
            total_required_credits,
            completed_credits,
            planned_credits,
            completion_percentage,
            requirements,
        }
    }

    /// Progress of a single category.
    ///
    /// A `min_courses` larger than the course list is accepted and simply
    /// never reaches `Complete`.
    pub fn compute_category(
        category: &RequirementCategory,
        completed_ids: &HashSet<String>,
        planned_ids: &HashSet<String>,
    ) -> CategoryProgress {
        let courses: Vec<RequirementCourseProgress> = category
            .courses
            .iter()
            .map(|course| {
                let id = normalize_course_id(&course.course_id);
                let completed = completed_ids.contains(&id);
                let planned = !completed && planned_ids.contains(&id);
                RequirementCourseProgress::new(course.clone(), completed, planned)
            })
            .collect();

        let completed_count = courses.iter().filter(|c| c.is_completed).count() as u32;
        let planned_count = courses.iter().filter(|c| c.is_planned).count() as u32;
        let required_count = required_count(category);

        CategoryProgress {
            category_id: category.id,
            requirement_type: category.requirement_type,
            category_name: category.display_name(),
            min_credits: category.min_credits,
            min_courses: category.min_courses,
            selection_notes: category.selection_notes.clone(),
            status: category_status(completed_count, planned_count, required_count),
            courses,
            completed_count,
            planned_count,
            required_count,
        }
    }
}

/// min_courses when set to a positive value, else the count of required entries
fn required_count(category: &RequirementCategory) -> u32 {
    match category.min_courses {
        Some(n) if n > 0 => n,
        _ => category.courses.iter().filter(|c| c.is_required).count() as u32,
    }
}

fn category_status(completed: u32, planned: u32, required: u32) -> CategoryStatus {
    if completed >= required {
        CategoryStatus::Complete
    } else if completed + planned >= required {
        CategoryStatus::InProgress
    } else {
        CategoryStatus::NotStarted
    }
}

/// min(100, completed / total * 100); 0 when the program declares no total
pub fn completion_percentage(completed_credits: u32, total_required_credits: u32) -> f64 {
    if total_required_credits == 0 {
        return 0.0;
    }
    (completed_credits as f64 / total_required_credits as f64 * 100.0).min(100.0)
}
