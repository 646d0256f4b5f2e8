// ==========================================
// Course Planner - engine layer
// ==========================================
// Rules engine over plain values. No SQL, no I/O except the
// orchestrator's reads through CatalogReader.
// Data flows one way: ScheduleStore -> evaluators / aggregators.
// ==========================================

pub mod credit_load;
pub mod gen_ed;
pub mod planner;
pub mod prerequisite;
pub mod program_selection;
pub mod requirements;
pub mod schedule_store;

pub use credit_load::{CreditLoadValidator, SemesterSummary, MAX_STANDARD_CREDITS, MIN_FULL_TIME_CREDITS};
pub use gen_ed::GenEdTracker;
pub use planner::{CourseSplit, PlannerOrchestrator, PlannerReport};
pub use prerequisite::{course_id_set, PrerequisiteCheck, PrerequisiteEvaluator};
pub use program_selection::{ProgramSelection, SelectionOutcome, MAX_MAJORS, MAX_MINORS, MAX_PROGRAMS};
pub use requirements::{completion_percentage, RequirementsAggregator};
pub use schedule_store::{Mutation, MutationOutcome, ScheduleCommand, ScheduleDefaults, ScheduleStore};
