use tabled::{settings::Style, Table, Tabled};

use crate::record::FileRecord;

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "Id")]
    id: i64,
    #[tabled(rename = "Filename")]
    filename: String,
    #[tabled(rename = "Size")]
    size: u64,
    #[tabled(rename = "On disk")]
    on_disk: &'static str,
}

/// Render registry records as a terminal table.
pub fn files_table(records: &[FileRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let rows: Vec<FileRow> = records
        .iter()
        .map(|r| FileRow {
            id: r.id,
            filename: r.filename.clone(),
            size: r.size_on_disk(),
            on_disk: if r.exists_on_disk() { "yes" } else { "no" },
        })
        .collect();

    Table::new(&rows).with(Style::rounded()).to_string()
}
