use thiserror::Error;

use super::table::{ColumnId, RowId, TableId};
use super::value::ColumnType;

/// Reasons a data-API call is refused before any command is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("table {0} does not exist")]
    TableNotFound(TableId),

    #[error("column {column} does not exist in table {table}")]
    ColumnNotFound { table: TableId, column: ColumnId },

    #[error("row {row} is out of range for table {table} ({rows} rows)")]
    RowOutOfRange {
        table: TableId,
        row: usize,
        rows: usize,
    },

    #[error("row {row} no longer exists in table {table}")]
    RowNotFound { table: TableId, row: RowId },

    #[error("'{text}' is not a valid {expected} value")]
    InvalidValue { text: String, expected: ColumnType },

    #[error("blank values are not allowed in this column")]
    BlankNotAllowed,

    #[error("column still holds blank values")]
    BlanksPresent,
}

pub type ModelResult<T> = Result<T, ModelError>;
