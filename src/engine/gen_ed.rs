// ==========================================
// Course Planner - GenEdTracker
// ==========================================
// A code is fulfilled by any one completed eligible course.
// Planned courses do not fulfill gen-ed codes.
// ==========================================

use crate::domain::course::normalize_course_id;
use crate::domain::progress::{GenEdCode, GenEdProgress, GenEdRequirement};
use std::collections::HashSet;

pub struct GenEdTracker;

impl GenEdTracker {
    /// One entry per catalog code, in catalog order.
    pub fn compute_gen_ed(catalog: &[GenEdCode], completed_ids: &HashSet<String>) -> GenEdProgress {
        let requirements: Vec<GenEdRequirement> = catalog
            .iter()
            .map(|code| Self::evaluate_code(code, completed_ids))
            .collect();

        let completed_count = requirements.iter().filter(|r| r.fulfilled).count() as u32;

        GenEdProgress {
            total_count: requirements.len() as u32,
            completed_count,
            requirements,
        }
    }

    fn evaluate_code(code: &GenEdCode, completed_ids: &HashSet<String>) -> GenEdRequirement {
        let mut seen = HashSet::new();
        let mut courses_taken = Vec::new();
        let mut courses_available = Vec::new();

        for id in code.eligible_course_ids.iter().map(|id| normalize_course_id(id)) {
            if !seen.insert(id.clone()) {
                continue;
            }
            if completed_ids.contains(&id) {
                courses_taken.push(id);
            } else {
                courses_available.push(id);
            }
        }

        GenEdRequirement {
            code: code.code.clone(),
            name: code.name.clone(),
            description: code.description.clone(),
            fulfilled: !courses_taken.is_empty(),
            courses_taken,
            courses_available,
        }
    }
}
