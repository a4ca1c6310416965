//! Storage Layer - SQLite-backed file registry
//!
//! System of record is SQLite with one table:
//! - excel_files(id, filename, filepath)
//!
//! The HTTP surface only ever reads it; rows are created externally
//! (CLI `register` or direct SQL).

pub mod schema;
pub mod sqlite;

pub use sqlite::{RegistryStats, RegistryStore};
