//! Table data model
//!
//! Tables, columns and cell values. Nothing in here records history; see
//! [`crate::command`] for the reversible operations built on top.

pub mod error;
pub mod store;
pub mod table;
pub mod value;

pub use error::{ModelError, ModelResult};
pub use store::TableStore;
pub use table::{Column, ColumnId, RowId, Table, TableId};
pub use value::{CellValue, ColumnType};
