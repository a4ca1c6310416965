//! Spreadsheet and CSV readers
//!
//! The first row of every source is treated as the header row. Workbook
//! formats read the first worksheet only.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use super::table::{Cell, Table};
use crate::{Error, Result};

/// Load a tabular file fully into memory, dispatching on extension.
pub fn load_table(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path),
        "csv" => load_csv(path),
        _ => Err(Error::UnsupportedFormat(path.display().to_string())),
    }
}

fn load_workbook(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::EmptyWorkbook(path.display().to_string()))??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::new(Vec::new()));
    };

    let columns = header
        .iter()
        .enumerate()
        .map(|(i, c)| header_name(c, i))
        .collect();

    let mut table = Table::new(columns);
    for row in rows {
        table.push_row(row.iter().map(cell_from_data).collect());
    }
    Ok(table)
}

fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(cell_from_str).collect());
    }
    Ok(table)
}

/// Header cells fall back to a positional name when blank.
fn header_name(data: &Data, index: usize) -> String {
    let name = data.to_string();
    if name.trim().is_empty() {
        format!("column_{}", index)
    } else {
        name.trim().to_string()
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

fn cell_from_str(value: &str) -> Cell {
    if value.is_empty() {
        Cell::Empty
    } else if let Ok(n) = value.parse::<f64>() {
        Cell::Number(n)
    } else {
        Cell::Text(value.to_string())
    }
}
