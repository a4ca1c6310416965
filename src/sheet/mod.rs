//! Tabular IO - in-memory tables, spreadsheet readers, xlsx writer
//!
//! Every source file is materialized fully in memory as a `Table` with a
//! header row before it is merged or projected. Readers cover the formats
//! the registry is expected to point at (xlsx/xlsm/xlsb/xls/ods via
//! calamine, csv via the csv crate); output is always xlsx.

pub mod reader;
pub mod table;
pub mod writer;

pub use reader::load_table;
pub use table::{Cell, Table};
pub use writer::{write_xlsx, xlsx_bytes};
