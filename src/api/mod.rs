// ==========================================
// Course Planner - API layer
// ==========================================
// Entry points for the CLI and other front ends.
// ==========================================

pub mod error;
pub mod planner_api;

pub use error::{ApiError, ApiResult};
pub use planner_api::{CommandResult, PlannerApi, SelectionResult};
