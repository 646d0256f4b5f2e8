// ==========================================
// Course Planner - repository layer
// ==========================================
// Data access only: no planning rules here.
// All queries are parameterized.
// ==========================================

pub mod catalog_repo;
pub mod error;
pub mod program_selection_repo;
pub mod schedule_repo;

pub use catalog_repo::{CatalogBundle, ImportSummary, ProgramBundle, SqliteCatalog};
pub use error::{RepositoryError, RepositoryResult};
pub use program_selection_repo::ProgramSelectionRepository;
pub use schedule_repo::{ScheduleListEntry, ScheduleRepository, StoredSchedule};
