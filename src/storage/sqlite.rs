//! SQLite registry implementation

use std::path::Path;

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::schema;
use crate::record::FileRecord;
use crate::Result;

/// SQLite-backed registry of spreadsheet files
pub struct RegistryStore {
    conn: Connection,
}

impl RegistryStore {
    /// Open a database file (creates schema if it doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Connectivity probe used by the health route
    pub fn ping(&self) -> Result<()> {
        self.conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    /// All registered files, ordered by filename
    pub fn list_all(&self) -> Result<Vec<FileRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, filename, filepath FROM excel_files ORDER BY filename, id",
        )?;

        let records = stmt
            .query_map([], |row| self.row_to_record(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(records)
    }

    /// Records whose id is in the given set. Ids with no match are silently
    /// omitted; an empty input returns an empty result without querying.
    pub fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<FileRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(",");
        let sql = format!(
            "SELECT id, filename, filepath FROM excel_files WHERE id IN ({placeholders}) ORDER BY filename, id"
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let records = stmt
            .query_map(params_from_iter(ids.iter()), |row| self.row_to_record(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(records)
    }

    /// Get a single record by id
    pub fn find_by_id(&self, id: i64) -> Result<Option<FileRecord>> {
        self.conn
            .query_row(
                "SELECT id, filename, filepath FROM excel_files WHERE id = ?1",
                [id],
                |row| self.row_to_record(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Case-insensitive substring search on filename
    pub fn search_by_name(&self, term: &str) -> Result<Vec<FileRecord>> {
        let pattern = format!("%{}%", term);
        let mut stmt = self.conn.prepare(
            "SELECT id, filename, filepath FROM excel_files WHERE filename LIKE ?1 ORDER BY filename, id",
        )?;

        let records = stmt
            .query_map([pattern], |row| self.row_to_record(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(records)
    }

    /// Register a file. Not reachable from the HTTP surface; this is the
    /// external creation path used by the CLI and by tests.
    pub fn insert(&self, filename: &str, filepath: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO excel_files (filename, filepath) VALUES (?1, ?2)",
            params![filename, filepath],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Count all registered files
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM excel_files", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Registry statistics: record count plus summed on-disk sizes.
    /// Missing files contribute 0 bytes.
    pub fn stats(&self) -> Result<RegistryStats> {
        let records = self.list_all()?;
        let total_size = records.iter().map(|r| r.size_on_disk()).sum();
        Ok(RegistryStats {
            total: records.len(),
            total_size,
        })
    }

    /// Helper to convert a row to a FileRecord
    fn row_to_record(&self, row: &rusqlite::Row) -> rusqlite::Result<FileRecord> {
        Ok(FileRecord {
            id: row.get(0)?,
            filename: row.get(1)?,
            filepath: row.get(2)?,
        })
    }
}

/// Registry statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct RegistryStats {
    pub total: usize,
    pub total_size: u64,
}

impl std::fmt::Display for RegistryStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Registry Statistics:")?;
        writeln!(f, "  Files: {}", self.total)?;
        writeln!(f, "  Total size: {} bytes", self.total_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_insert_and_find() {
        let store = RegistryStore::open_in_memory().unwrap();

        let id = store.insert("sales.xlsx", "/data/sales.xlsx").unwrap();

        let record = store.find_by_id(id).unwrap().unwrap();
        assert_eq!(record.filename, "sales.xlsx");
        assert_eq!(record.filepath, "/data/sales.xlsx");

        assert!(store.find_by_id(id + 100).unwrap().is_none());
    }

    #[test]
    fn test_list_all_ordered_by_filename() {
        let store = RegistryStore::open_in_memory().unwrap();

        store.insert("b.xlsx", "/data/b.xlsx").unwrap();
        store.insert("a.xlsx", "/data/a.xlsx").unwrap();
        store.insert("c.xlsx", "/data/c.xlsx").unwrap();

        let names: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|r| r.filename)
            .collect();
        assert_eq!(names, vec!["a.xlsx", "b.xlsx", "c.xlsx"]);
    }

    #[test]
    fn test_find_by_ids_omits_missing() {
        let store = RegistryStore::open_in_memory().unwrap();

        let a = store.insert("a.xlsx", "/data/a.xlsx").unwrap();
        let b = store.insert("b.xlsx", "/data/b.xlsx").unwrap();

        let found = store.find_by_ids(&[a, b, 999]).unwrap();
        assert_eq!(found.len(), 2);

        assert!(store.find_by_ids(&[]).unwrap().is_empty());
        assert!(store.find_by_ids(&[999]).unwrap().is_empty());
    }

    #[test]
    fn test_search_by_name() {
        let store = RegistryStore::open_in_memory().unwrap();

        store.insert("sales_2024.xlsx", "/data/sales_2024.xlsx").unwrap();
        store.insert("sales_2025.xlsx", "/data/sales_2025.xlsx").unwrap();
        store.insert("inventory.xlsx", "/data/inventory.xlsx").unwrap();

        let hits = store.search_by_name("sales").unwrap();
        assert_eq!(hits.len(), 2);

        let hits = store.search_by_name("SALES").unwrap();
        assert_eq!(hits.len(), 2);

        assert!(store.search_by_name("missing").unwrap().is_empty());
    }

    #[test]
    fn test_stats_sums_existing_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let on_disk = dir.path().join("real.csv");
        let mut f = std::fs::File::create(&on_disk).unwrap();
        f.write_all(b"a,b\n1,2\n").unwrap();

        let store = RegistryStore::open_in_memory().unwrap();
        store
            .insert("real.csv", on_disk.to_str().unwrap())
            .unwrap();
        store.insert("gone.xlsx", "/nonexistent/gone.xlsx").unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.total_size, 8);
    }
}
