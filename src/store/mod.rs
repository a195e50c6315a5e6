//! Tabular data model: cells, columns, datasets and CSV loading.
pub mod csv;
mod error;
mod table;
mod types;

pub use self::error::DatasetError;
pub use self::table::Dataset;
pub use self::types::{Cell, Column, ColumnKind, Label};
