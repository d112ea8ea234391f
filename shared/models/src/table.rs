//! In-memory sheet table.
//!
//! Headers and rows keep the order they had in the workbook. A cell is
//! `None` when the source cell was empty; cleaning replaces absent cells in
//! non-link columns with the sentinel dash.

use serde::{Deserialize, Serialize};

/// Sentinel written into cleaned-away and unresolved cells.
pub const SENTINEL: &str = "-";

pub type Cell = Option<String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Builds a table from string literals, mostly useful in tests.
    /// Empty strings become absent cells.
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        let mut table = Self::new(headers.iter().map(|h| h.to_string()).collect());
        for row in rows {
            table.push_row(
                row.iter()
                    .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
                    .collect(),
            );
        }
        table
    }

    /// Appends a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut [String] {
        &mut self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Vec<Cell>] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// A table without rows or without columns counts as empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.headers.is_empty()
    }

    /// Exact (case-sensitive) header lookup.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    pub fn value(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }

    /// Values of one column, in row order.
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(column).and_then(|c| c.as_deref()))
    }

    /// Returns a copy holding only the rows accepted by `keep`.
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[Cell]) -> bool,
    {
        Table {
            headers: self.headers.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row.as_slice()))
                .cloned()
                .collect(),
        }
    }

    /// Returns a copy restricted to the given columns, in the given order.
    pub fn select_columns(&self, columns: &[usize]) -> Table {
        Table {
            headers: columns
                .iter()
                .filter_map(|&c| self.headers.get(c).cloned())
                .collect(),
            rows: self
                .rows
                .iter()
                .map(|row| {
                    columns
                        .iter()
                        .filter(|&&c| c < self.headers.len())
                        .map(|&c| row.get(c).cloned().flatten())
                        .collect()
                })
                .collect(),
        }
    }
}
