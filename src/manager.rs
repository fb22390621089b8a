//! Data API over the table store.
//!
//! Every mutator validates its input first, then builds a [`Command`] that
//! captures whatever it needs to undo itself and pushes it through
//! [`History`]. Rejected input never reaches the history.

use tracing::debug;

use crate::command::{Command, History};
use crate::model::{
    CellValue, Column, ColumnId, ColumnType, ModelError, ModelResult, RowId, Table, TableId,
    TableStore,
};

#[derive(Debug, Default)]
pub struct TableManager {
    store: TableStore,
    history: History,
}

impl TableManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &TableStore {
        &self.store
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.store.table(id)
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.store)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.store)
    }

    fn execute(&mut self, command: Command) {
        self.history.execute(command, &mut self.store);
    }

    fn require_table(&self, id: TableId) -> ModelResult<&Table> {
        self.store.table(id).ok_or(ModelError::TableNotFound(id))
    }

    fn require_column(&self, table: TableId, column: ColumnId) -> ModelResult<&Column> {
        self.require_table(table)?
            .column(column)
            .ok_or(ModelError::ColumnNotFound { table, column })
    }

    // ---- tables ----

    /// Append a new table named `Table<n>`.
    pub fn add_table(&mut self) -> TableId {
        let id = self.store.allocate_table_id();
        let table = Table::new(id, self.store.unique_table_name());
        let index = self.store.len();
        self.execute(Command::AddTable { index, table });
        id
    }

    pub fn remove_table(&mut self, id: TableId) -> ModelResult<()> {
        let index = self
            .store
            .table_index(id)
            .ok_or(ModelError::TableNotFound(id))?;
        let table = self.store.tables()[index].clone();
        self.execute(Command::RemoveTable { index, table });
        Ok(())
    }

    pub fn rename_table(&mut self, id: TableId, name: &str) -> ModelResult<()> {
        let old_name = self.require_table(id)?.name().to_string();
        if old_name == name {
            return Ok(());
        }
        self.execute(Command::RenameTable {
            table: id,
            old_name,
            new_name: name.to_string(),
        });
        Ok(())
    }

    // ---- columns ----

    /// Append a String column named `Column<n>`, filling existing rows with
    /// its default.
    pub fn add_column(&mut self, table: TableId) -> ModelResult<ColumnId> {
        let (name, rows, index) = {
            let t = self.require_table(table)?;
            (t.unique_column_name(), t.row_count(), t.columns().len())
        };
        let id = self.store.allocate_column_id();
        let column = Column::new(id, name, rows);
        self.execute(Command::AddColumn {
            table,
            index,
            column,
        });
        Ok(id)
    }

    pub fn remove_column(&mut self, table: TableId, column: ColumnId) -> ModelResult<()> {
        let t = self.require_table(table)?;
        let index = t
            .column_index(column)
            .ok_or(ModelError::ColumnNotFound { table, column })?;
        let column = t.columns()[index].clone();
        self.execute(Command::RemoveColumn {
            table,
            index,
            column,
        });
        Ok(())
    }

    pub fn rename_column(
        &mut self,
        table: TableId,
        column: ColumnId,
        name: &str,
    ) -> ModelResult<()> {
        let old_name = self.require_column(table, column)?.name().to_string();
        if old_name == name {
            return Ok(());
        }
        self.execute(Command::RenameColumn {
            table,
            column,
            old_name,
            new_name: name.to_string(),
        });
        Ok(())
    }

    /// Advance the column to the next type in the cycle. Returns the new type.
    pub fn change_type(&mut self, table: TableId, column: ColumnId) -> ModelResult<ColumnType> {
        let before = self.require_column(table, column)?.clone();
        let next = before.column_type().next();
        let after = before.converted_to(next);
        self.execute(Command::ChangeType {
            table,
            before,
            after,
        });
        Ok(next)
    }

    /// Flip the allows-blanks flag. Disallowing is refused while the column
    /// or its default holds a blank. Returns the new flag.
    pub fn toggle_allow_blanks(&mut self, table: TableId, column: ColumnId) -> ModelResult<bool> {
        let c = self.require_column(table, column)?;
        let allows = !c.allows_blanks();
        if !allows && c.has_blanks() {
            return Err(ModelError::BlanksPresent);
        }
        self.execute(Command::SetAllowBlanks {
            table,
            column,
            allows,
        });
        Ok(allows)
    }

    pub fn set_default_value(
        &mut self,
        table: TableId,
        column: ColumnId,
        text: &str,
    ) -> ModelResult<()> {
        let c = self.require_column(table, column)?;
        let new_value = CellValue::parse(c.column_type(), text, c.allows_blanks())?;
        let old_value = c.default_value().clone();
        if old_value == new_value {
            return Ok(());
        }
        self.execute(Command::SetDefaultValue {
            table,
            column,
            old_value,
            new_value,
        });
        Ok(())
    }

    pub fn default_value(&self, table: TableId, column: ColumnId) -> Option<&CellValue> {
        self.store
            .table(table)
            .and_then(|t| t.column(column))
            .map(Column::default_value)
    }

    // ---- rows ----

    /// Append a row of column defaults. Returns its index.
    pub fn add_row(&mut self, table: TableId) -> ModelResult<usize> {
        let (index, values) = {
            let t = self.require_table(table)?;
            (t.row_count(), t.default_row())
        };
        let id = self.store.allocate_row_id();
        self.execute(Command::AddRow {
            table,
            index,
            id,
            values,
        });
        Ok(index)
    }

    pub fn remove_row(&mut self, table: TableId, row: usize) -> ModelResult<()> {
        let t = self.require_table(table)?;
        let out_of_range = ModelError::RowOutOfRange {
            table,
            row,
            rows: t.row_count(),
        };
        let (id, values) = t.row_id(row).zip(t.row(row)).ok_or(out_of_range)?;
        self.execute(Command::RemoveRow {
            table,
            index: row,
            id,
            values,
        });
        Ok(())
    }

    pub fn row_id(&self, table: TableId, row: usize) -> Option<RowId> {
        self.store.table(table).and_then(|t| t.row_id(row))
    }

    /// Where a row currently sits, if it still exists.
    pub fn row_index(&self, table: TableId, row: RowId) -> Option<usize> {
        self.store.table(table).and_then(|t| t.row_index(row))
    }

    pub fn update_cell(
        &mut self,
        table: TableId,
        column: ColumnId,
        row: usize,
        text: &str,
    ) -> ModelResult<()> {
        let c = self.require_column(table, column)?;
        let new_value = CellValue::parse(c.column_type(), text, c.allows_blanks())?;
        let old_value = c
            .cell(row)
            .cloned()
            .ok_or(ModelError::RowOutOfRange {
                table,
                row,
                rows: c.cells().len(),
            })?;
        if old_value == new_value {
            debug!(target: "history", "cell {}[{}] unchanged, no command", column, row);
            return Ok(());
        }
        self.execute(Command::UpdateCell {
            table,
            column,
            row,
            old_value,
            new_value,
        });
        Ok(())
    }

    pub fn cell(&self, table: TableId, column: ColumnId, row: usize) -> Option<&CellValue> {
        self.store
            .table(table)
            .and_then(|t| t.column(column))
            .and_then(|c| c.cell(row))
    }
}
