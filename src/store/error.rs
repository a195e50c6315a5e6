//! Defines the error types for the store module.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV parse error on line {line}: {msg}")]
    Parse { line: usize, msg: String },
    #[error("Line {line} has {found} fields, header has {expected}")]
    RaggedRow { line: usize, expected: usize, found: usize },
    #[error("Column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch { column: String, expected: usize, found: usize },
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),
    #[error("Row {row} out of range for {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },
    #[error("Column '{column}' is not numeric at row {row}")]
    NotNumeric { column: String, row: usize },
}
