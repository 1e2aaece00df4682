//! SemSearch Company Catalog
//!
//! Typed company records and CSV catalog ingestion

pub mod loader;
pub mod model;

pub use loader::{load_companies, read_companies};
pub use model::CompanyRecord;
