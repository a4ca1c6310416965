//! File Unifier
//!
//! Resolves a comma-delimited id string against the registry, loads each
//! resolvable file as a table and stacks their rows in request order.
//! Inputs that contribute nothing are never an error here: they land in the
//! outcome's skip list with a reason, so callers can report partial merges.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::sheet::{self, Table};
use crate::storage::RegistryStore;
use crate::Result;

/// Merges registered spreadsheet files against one store.
pub struct Unifier<'a> {
    store: &'a RegistryStore,
}

impl<'a> Unifier<'a> {
    pub fn new(store: &'a RegistryStore) -> Self {
        Self { store }
    }

    /// Run the full unify pipeline over a raw `ids` query string.
    ///
    /// `table` is `None` when no input survived; everything that was
    /// dropped along the way is listed in `skipped`.
    pub fn unify(&self, raw_ids: &str) -> Result<UnifyOutcome> {
        let mut skipped = Vec::new();
        let ids = parse_ids(raw_ids, &mut skipped);

        let by_id: HashMap<i64, _> = self
            .store
            .find_by_ids(&ids)?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        let mut loaded = Vec::new();
        let mut table: Option<Table> = None;

        // Stacking order is the first-occurrence order of ids in the request,
        // not the store's return order.
        for id in ids {
            let Some(record) = by_id.get(&id) else {
                skipped.push(SkippedSource::new(id.to_string(), SkipReason::UnknownId));
                continue;
            };

            // The registry may be stale; never trust filepath blindly.
            if !record.exists_on_disk() {
                skipped.push(
                    SkippedSource::new(id.to_string(), SkipReason::MissingOnDisk)
                        .with_filename(&record.filename),
                );
                continue;
            }

            let part = sheet::load_table(Path::new(&record.filepath))?;
            tracing::debug!(id, filename = %record.filename, rows = part.row_count(), "loaded source");
            loaded.push(LoadedSource {
                id,
                filename: record.filename.clone(),
                rows: part.row_count(),
            });

            match table.as_mut() {
                Some(merged) => merged.append(part),
                None => table = Some(part),
            }
        }

        Ok(UnifyOutcome {
            table,
            loaded,
            skipped,
        })
    }
}

/// Extract registry ids from a delimited token string.
///
/// A token counts only if every character is an ASCII digit; anything else
/// (including empty tokens from `"1,,2"`) is recorded as malformed and
/// dropped. Duplicates collapse to their first occurrence.
fn parse_ids(raw: &str, skipped: &mut Vec<SkippedSource>) -> Vec<i64> {
    let mut ids = Vec::new();
    for token in raw.split(',') {
        if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
            skipped.push(SkippedSource::new(token, SkipReason::MalformedToken));
            continue;
        }
        match token.parse::<i64>() {
            Ok(id) => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            // all-digit but beyond i64: cannot name any record
            Err(_) => skipped.push(SkippedSource::new(token, SkipReason::UnknownId)),
        }
    }
    ids
}

/// Result of one unify run.
#[derive(Debug)]
pub struct UnifyOutcome {
    /// The merged table, `None` when no input file was loadable.
    pub table: Option<Table>,
    pub loaded: Vec<LoadedSource>,
    pub skipped: Vec<SkippedSource>,
}

impl UnifyOutcome {
    pub fn row_count(&self) -> usize {
        self.table.as_ref().map(Table::row_count).unwrap_or(0)
    }
}

/// An input that contributed rows to the merge.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedSource {
    pub id: i64,
    pub filename: String,
    pub rows: usize,
}

/// An input that was dropped, and why.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedSource {
    pub token: String,
    pub reason: SkipReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl SkippedSource {
    fn new(token: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            token: token.into(),
            reason,
            filename: None,
        }
    }

    fn with_filename(mut self, filename: &str) -> Self {
        self.filename = Some(filename.to_string());
        self
    }
}

/// Why an input was dropped from the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MalformedToken,
    UnknownId,
    MissingOnDisk,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SkipReason::MalformedToken => "malformed token",
            SkipReason::UnknownId => "unknown id",
            SkipReason::MissingOnDisk => "missing on disk",
        };
        write!(f, "{}", label)
    }
}
