//! In-memory tabular values

use crate::{Error, Result};

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// A table with named columns and rows of cells.
///
/// Rows are always exactly as wide as the column list; `push_row` pads or
/// truncates to keep that invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    /// Stack another table's rows under this one.
    ///
    /// Columns align by name. Columns the other table introduces are added
    /// on the right; cells with no source column stay empty. Row order is
    /// preserved: existing rows first, then the other table's rows.
    pub fn append(&mut self, other: Table) {
        let mut index_map = Vec::with_capacity(other.columns.len());
        for name in &other.columns {
            let idx = match self.columns.iter().position(|c| c == name) {
                Some(i) => i,
                None => {
                    self.columns.push(name.clone());
                    for row in &mut self.rows {
                        row.push(Cell::Empty);
                    }
                    self.columns.len() - 1
                }
            };
            index_map.push(idx);
        }

        for row in other.rows {
            let mut merged = vec![Cell::Empty; self.columns.len()];
            for (i, cell) in row.into_iter().enumerate() {
                merged[index_map[i]] = cell;
            }
            self.rows.push(merged);
        }
    }

    /// Project onto the named columns, in the requested order.
    ///
    /// Names with no matching column are dropped; if none match, this is an
    /// `UnknownColumn` error.
    pub fn project(&self, names: &[&str]) -> Result<Table> {
        let indices: Vec<usize> = names
            .iter()
            .filter_map(|name| self.columns.iter().position(|c| c == name))
            .collect();

        if indices.is_empty() {
            return Err(Error::UnknownColumn(names.join(",")));
        }

        let columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        let mut projected = Table::new(columns);
        for row in &self.rows {
            projected
                .rows
                .push(indices.iter().map(|&i| row[i].clone()).collect());
        }
        Ok(projected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        let mut t = Table::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(row.iter().map(|v| Cell::Text(v.to_string())).collect());
        }
        t
    }

    #[test]
    fn test_append_same_columns() {
        let mut first = table(&["A", "B"], &[&["1", "2"], &["3", "4"], &["5", "6"]]);
        let second = table(&["A", "B"], &[&["7", "8"], &["9", "10"], &["11", "12"], &["13", "14"]]);

        first.append(second);

        assert_eq!(first.row_count(), 7);
        assert_eq!(first.columns(), &["A", "B"]);
        assert_eq!(first.rows()[0][0], Cell::Text("1".to_string()));
        assert_eq!(first.rows()[3][0], Cell::Text("7".to_string()));
    }

    #[test]
    fn test_append_unions_columns() {
        let mut first = table(&["A", "B"], &[&["1", "2"]]);
        let second = table(&["B", "C"], &[&["3", "4"]]);

        first.append(second);

        assert_eq!(first.columns(), &["A", "B", "C"]);
        assert_eq!(first.row_count(), 2);
        // first source has no C
        assert_eq!(first.rows()[0][2], Cell::Empty);
        // second source has no A, and its B lands under the shared B column
        assert_eq!(first.rows()[1][0], Cell::Empty);
        assert_eq!(first.rows()[1][1], Cell::Text("3".to_string()));
        assert_eq!(first.rows()[1][2], Cell::Text("4".to_string()));
    }

    #[test]
    fn test_append_into_empty_table() {
        let mut merged = Table::new(Vec::new());
        merged.append(table(&["A"], &[&["1"], &["2"]]));

        assert_eq!(merged.columns(), &["A"]);
        assert_eq!(merged.row_count(), 2);
    }

    #[test]
    fn test_push_row_pads_and_truncates() {
        let mut t = Table::new(vec!["A".to_string(), "B".to_string()]);
        t.push_row(vec![Cell::Number(1.0)]);
        t.push_row(vec![Cell::Number(1.0), Cell::Number(2.0), Cell::Number(3.0)]);

        assert_eq!(t.rows()[0], vec![Cell::Number(1.0), Cell::Empty]);
        assert_eq!(t.rows()[1].len(), 2);
    }

    #[test]
    fn test_project_keeps_requested_order() {
        let t = table(&["A", "B", "C"], &[&["1", "2", "3"]]);

        let projected = t.project(&["C", "A"]).unwrap();
        assert_eq!(projected.columns(), &["C", "A"]);
        assert_eq!(
            projected.rows()[0],
            vec![Cell::Text("3".to_string()), Cell::Text("1".to_string())]
        );
    }

    #[test]
    fn test_project_drops_unknown_names() {
        let t = table(&["A", "B"], &[&["1", "2"]]);

        let projected = t.project(&["B", "missing"]).unwrap();
        assert_eq!(projected.columns(), &["B"]);

        assert!(t.project(&["nope"]).is_err());
    }
}
