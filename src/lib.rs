//! # Sheetfuse - Spreadsheet registry and merge service
//!
//! A small backend over a registry of spreadsheet files.
//!
//! Sheetfuse provides:
//! - A SQLite-backed registry mapping file ids to filenames and paths
//! - A unify operation that stacks the rows of selected files into one table
//! - Tabular readers (xlsx/xls/ods/csv) and an xlsx writer
//! - An HTTP surface for listing, inspecting and merging registered files

pub mod config;
pub mod record;
pub mod server;
pub mod sheet;
pub mod storage;
pub mod ui;
pub mod unify;

// Re-exports for convenient access
pub use record::{FileDetails, FileListing, FileRecord};
pub use sheet::Table;
pub use storage::RegistryStore;
pub use unify::{UnifyOutcome, Unifier};

/// Result type alias for Sheetfuse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Sheetfuse operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet read error: {0}")]
    SheetRead(#[from] calamine::Error),

    #[error("Spreadsheet write error: {0}")]
    SheetWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("No worksheet in workbook: {0}")]
    EmptyWorkbook(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}
