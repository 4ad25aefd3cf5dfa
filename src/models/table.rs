use crate::error::{ProcessingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell of a tabular input or output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Build a cell from a raw CSV field; blank fields become `Empty`.
    pub fn from_field(field: &str) -> Self {
        if field.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(field.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => Some(*v),
            Cell::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(v) => write!(f, "{}", v),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// Row-ordered table with a named header.
///
/// Every row holds exactly one cell per header column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
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

    /// Build a table from a header and rows, rejecting rows of the wrong width.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Build a table column by column, as a data frame literal would.
    pub fn from_columns(columns: Vec<(&str, Vec<Cell>)>) -> Result<Self> {
        let height = columns.first().map_or(0, |(_, cells)| cells.len());
        if let Some((name, cells)) = columns.iter().find(|(_, cells)| cells.len() != height) {
            return Err(ProcessingError::InvalidFormat(format!(
                "Column '{}' has {} values, expected {}",
                name,
                cells.len(),
                height
            )));
        }

        let header = columns.iter().map(|(name, _)| name.to_string()).collect();
        let mut rows = vec![Vec::with_capacity(columns.len()); height];
        for (_, cells) in columns {
            for (row, cell) in rows.iter_mut().zip(cells) {
                row.push(cell);
            }
        }

        Ok(Self {
            columns: header,
            rows,
        })
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Row has {} cells, expected {}",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Look up a column index, failing with the column name when absent.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| ProcessingError::InvalidColumn {
                column: name.to_string(),
            })
    }

    /// Iterate over the cells of one column.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Look up a cell by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[index])
    }

    /// Keep only the rows at `indices` (in the given order).
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Append a column; `cells` must match the table height.
    pub fn append_column(&mut self, name: impl Into<String>, cells: Vec<Cell>) -> Result<()> {
        let name = name.into();
        if cells.len() != self.rows.len() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Column '{}' has {} values, expected {}",
                name,
                cells.len(),
                self.rows.len()
            )));
        }

        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.push(cell);
        }
        self.columns.push(name);
        Ok(())
    }

    /// Format the header and the first `limit` rows as aligned text.
    pub fn preview(&self, limit: usize) -> String {
        let shown = &self.rows[..limit.min(self.rows.len())];
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        let rendered: Vec<Vec<String>> = shown
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        for row in &rendered {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let format_line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut lines = vec![format_line(&self.columns)];
        lines.extend(rendered.iter().map(|row| format_line(row)));
        if self.rows.len() > shown.len() {
            lines.push(format!("... ({} more rows)", self.rows.len() - shown.len()));
        }
        lines.join("\n")
    }
}
