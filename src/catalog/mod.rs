// ==========================================
// Course Planner - catalog access
// ==========================================
// Read-only view of courses, programs and gen-ed codes.
// ==========================================

pub mod catalog_reader;
pub mod in_memory;

pub use catalog_reader::CatalogReader;
pub use in_memory::InMemoryCatalog;
