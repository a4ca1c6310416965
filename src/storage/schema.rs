//! Database schema definitions

/// SQL to create the file registry table
pub const CREATE_EXCEL_FILES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS excel_files (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL,
    filepath TEXT NOT NULL
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_excel_files_filename ON excel_files(filename)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_EXCEL_FILES_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
