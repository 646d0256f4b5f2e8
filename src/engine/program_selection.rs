// ==========================================
// Course Planner - ProgramSelection
// ==========================================
// At most 2 majors, 2 minors (certificates included), 3 programs total.
// A rejected add returns the selection unchanged plus the reason.
// ==========================================

use crate::domain::program::{Program, SelectedPrograms};
use crate::domain::types::ProgramType;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_MAJORS: usize = 2;
pub const MAX_MINORS: usize = 2;
pub const MAX_PROGRAMS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum SelectionOutcome {
    Accepted,
    Rejected(String),
}

impl SelectionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SelectionOutcome::Accepted)
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            SelectionOutcome::Accepted => None,
            SelectionOutcome::Rejected(reason) => Some(reason),
        }
    }
}

impl fmt::Display for SelectionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionOutcome::Accepted => write!(f, "accepted"),
            SelectionOutcome::Rejected(reason) => write!(f, "rejected: {}", reason),
        }
    }
}

pub struct ProgramSelection;

impl ProgramSelection {
    /// Checks are applied in order: total cap, duplicate, per-type cap.
    pub fn add_program(
        selected: &SelectedPrograms,
        program: Program,
    ) -> (SelectedPrograms, SelectionOutcome) {
        if let Some(reason) = Self::rejection(selected, &program) {
            tracing::info!(program_id = %program.program_id, reason, "program selection rejected");
            return (selected.clone(), SelectionOutcome::Rejected(reason.to_string()));
        }

        let mut next = selected.clone();
        match program.program_type {
            ProgramType::Major => next.majors.push(program),
            ProgramType::Minor | ProgramType::Certificate => next.minors.push(program),
        }
        (next, SelectionOutcome::Accepted)
    }

    /// Removes the program from whichever list holds it; unknown ids are a no-op.
    pub fn remove_program(selected: &SelectedPrograms, program_id: &str) -> SelectedPrograms {
        SelectedPrograms {
            majors: selected
                .majors
                .iter()
                .filter(|p| p.program_id != program_id)
                .cloned()
                .collect(),
            minors: selected
                .minors
                .iter()
                .filter(|p| p.program_id != program_id)
                .cloned()
                .collect(),
        }
    }

    fn rejection(selected: &SelectedPrograms, program: &Program) -> Option<&'static str> {
        if selected.total() >= MAX_PROGRAMS {
            return Some("Maximum 3 programs allowed (majors + minors)");
        }
        if selected.contains(&program.program_id) {
            return Some("Program already added");
        }
        match program.program_type {
            ProgramType::Major if selected.majors.len() >= MAX_MAJORS => {
                Some("Maximum 2 majors allowed")
            }
            ProgramType::Minor | ProgramType::Certificate if selected.minors.len() >= MAX_MINORS => {
                Some("Maximum 2 minors allowed")
            }
            _ => None,
        }
    }
}
