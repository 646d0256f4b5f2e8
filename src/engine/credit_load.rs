// ==========================================
// Course Planner - CreditLoadValidator
// ==========================================
// total > 18           -> Overload
// 0 < total < 12       -> Underload
// otherwise (incl. 0)  -> Normal
// Thresholds are fixed policy, not per-program configuration.
// ==========================================

use crate::domain::schedule::{Schedule, Semester};
use crate::domain::types::CreditLoad;
use crate::engine::schedule_store::semester_credits;
use serde::{Deserialize, Serialize};

/// Lowest total that is not an underload
pub const MIN_FULL_TIME_CREDITS: u32 = 12;

/// Highest total that is not an overload
pub const MAX_STANDARD_CREDITS: u32 = 18;

pub struct CreditLoadValidator;

impl CreditLoadValidator {
    pub fn classify(total_credits: u32) -> CreditLoad {
        if total_credits > MAX_STANDARD_CREDITS {
            CreditLoad::Overload
        } else if total_credits > 0 && total_credits < MIN_FULL_TIME_CREDITS {
            CreditLoad::Underload
        } else {
            CreditLoad::Normal
        }
    }

    pub fn summarize_semester(semester: &Semester) -> SemesterSummary {
        let total_credits = semester_credits(semester);
        let load = Self::classify(total_credits);
        SemesterSummary {
            semester_id: semester.id.clone(),
            label: semester.label(),
            course_count: semester.courses.len(),
            total_credits,
            load,
            warning: load
                .label()
                .map(|label| format!("{} credits ({})", total_credits, label)),
        }
    }

    /// One summary per semester, in list order
    pub fn summarize(schedule: &Schedule) -> Vec<SemesterSummary> {
        schedule.semesters.iter().map(Self::summarize_semester).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterSummary {
    pub semester_id: String,
    pub label: String,
    pub course_count: usize,
    pub total_credits: u32,
    pub load: CreditLoad,
    pub warning: Option<String>,
}
