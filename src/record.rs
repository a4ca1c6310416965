//! Registry record types
//!
//! `FileRecord` is one row of the `excel_files` registry. The filesystem
//! path is internal: client-facing views (`FileListing`, `FileDetails`)
//! never carry it.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// One row of the file registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Primary key in the registry
    pub id: i64,
    /// Display name shown to clients
    pub filename: String,
    /// Filesystem location of the spreadsheet. Never serialized to clients;
    /// may be stale, so callers must re-check existence before loading.
    pub filepath: String,
}

impl FileRecord {
    pub fn new(id: i64, filename: impl Into<String>, filepath: impl Into<String>) -> Self {
        Self {
            id,
            filename: filename.into(),
            filepath: filepath.into(),
        }
    }

    /// Whether the registered path currently exists on disk.
    pub fn exists_on_disk(&self) -> bool {
        Path::new(&self.filepath).exists()
    }

    /// On-disk size in bytes, 0 when the file is missing or unreadable.
    pub fn size_on_disk(&self) -> u64 {
        std::fs::metadata(&self.filepath).map(|m| m.len()).unwrap_or(0)
    }

    /// Client-facing listing view (id + filename only).
    pub fn listing(&self) -> FileListing {
        FileListing {
            id: self.id,
            filename: self.filename.clone(),
        }
    }

    /// Client-facing detail view with on-disk size and availability.
    pub fn details(&self) -> FileDetails {
        FileDetails {
            id: self.id,
            filename: self.filename.clone(),
            size: self.size_on_disk(),
            available: self.exists_on_disk(),
        }
    }
}

/// Listing entry returned by list and search routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileListing {
    pub id: i64,
    pub filename: String,
}

/// Detail view returned by the single-file route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDetails {
    pub id: i64,
    pub filename: String,
    pub size: u64,
    pub available: bool,
}
