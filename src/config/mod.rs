// ==========================================
// Course Planner - configuration layer
// ==========================================
// Storage: config_kv table
// Credit-load thresholds and program caps are constants in the
// engine, not configuration.
// ==========================================

pub mod config_manager;
pub mod planner_config_trait;

pub use config_manager::{config_keys, ConfigManager};
pub use planner_config_trait::PlannerConfigReader;
