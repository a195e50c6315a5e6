//! Column-oriented in-memory table.
use super::error::DatasetError;
use super::types::{Cell, Column};
use std::collections::HashSet;

/// An ordered set of equally sized, uniquely named columns.
///
/// Every operation that derives a new table (`select`, `slice`, `repeat`, ...)
/// returns an owned copy, so perturbations never leak into the caller's data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self, DatasetError> {
        let rows = columns.first().map_or(0, Column::len);
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(DatasetError::DuplicateColumn(col.name.clone()));
            }
            if col.len() != rows {
                return Err(DatasetError::LengthMismatch {
                    column: col.name.clone(),
                    expected: rows,
                    found: col.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Returns the names in `required` that this table lacks, in order.
    pub fn missing_columns(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|name| !self.has_column(name))
            .cloned()
            .collect()
    }

    /// Ordered projection onto `names`.
    pub fn select(&self, names: &[String]) -> Result<Dataset, DatasetError> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let col = self
                .column(name)
                .ok_or_else(|| DatasetError::UnknownColumn(name.clone()))?;
            columns.push(col.clone());
        }
        Dataset::new(columns)
    }

    /// Copy without the named column. Absent names are a no-op.
    pub fn without(&self, name: &str) -> Dataset {
        let columns: Vec<Column> = self.columns.iter().filter(|c| c.name != name).cloned().collect();
        let rows = if columns.is_empty() { 0 } else { self.rows };
        Dataset { columns, rows }
    }

    /// Rows `start..end`, clamped to the table size.
    pub fn slice(&self, start: usize, end: usize) -> Dataset {
        let end = end.min(self.rows);
        let start = start.min(end);
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.cells[start..end].to_vec()))
            .collect();
        Dataset { columns, rows: end - start }
    }

    /// Contiguous partitions of at most `size` rows, in order.
    pub fn chunks(&self, size: usize) -> Vec<Dataset> {
        let size = size.max(1);
        (0..self.rows)
            .step_by(size)
            .map(|start| self.slice(start, start + size))
            .collect()
    }

    /// The table stacked onto itself `times` times.
    pub fn repeat(&self, times: usize) -> Dataset {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let mut cells = Vec::with_capacity(c.len() * times);
                for _ in 0..times {
                    cells.extend_from_slice(&c.cells);
                }
                Column::new(c.name.clone(), cells)
            })
            .collect();
        Dataset { columns, rows: self.rows * times }
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        self.column(column)?.cells.get(row)
    }

    pub fn set(&mut self, row: usize, column: &str, cell: Cell) -> Result<(), DatasetError> {
        let rows = self.rows;
        let col = self
            .columns
            .iter_mut()
            .find(|c| c.name == column)
            .ok_or_else(|| DatasetError::UnknownColumn(column.to_string()))?;
        let slot = col
            .cells
            .get_mut(row)
            .ok_or(DatasetError::RowOutOfRange { row, rows })?;
        *slot = cell;
        Ok(())
    }

    pub fn columns_mut(&mut self) -> impl Iterator<Item = &mut Column> {
        self.columns.iter_mut()
    }

    /// Numeric view of a column. Missing cells are `None`; text is an error.
    pub fn numeric_values(&self, column: &str) -> Result<Vec<Option<f64>>, DatasetError> {
        let col = self
            .column(column)
            .ok_or_else(|| DatasetError::UnknownColumn(column.to_string()))?;
        col.cells
            .iter()
            .enumerate()
            .map(|(row, cell)| match cell {
                Cell::Number(v) => Ok(Some(*v)),
                Cell::Missing => Ok(None),
                Cell::Text(_) => Err(DatasetError::NotNumeric { column: column.to_string(), row }),
            })
            .collect()
    }
}
