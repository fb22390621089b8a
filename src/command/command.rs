use std::fmt;

use tracing::error;

use crate::model::{CellValue, Column, ColumnId, RowId, Table, TableId, TableStore};

/// One reversible data mutation.
///
/// Every variant carries the state it needs to invert itself, captured when
/// the command was built: removals keep the removed entity and its position,
/// updates keep the value they overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddTable {
        index: usize,
        table: Table,
    },
    RemoveTable {
        index: usize,
        table: Table,
    },
    RenameTable {
        table: TableId,
        old_name: String,
        new_name: String,
    },
    AddColumn {
        table: TableId,
        index: usize,
        column: Column,
    },
    RemoveColumn {
        table: TableId,
        index: usize,
        column: Column,
    },
    RenameColumn {
        table: TableId,
        column: ColumnId,
        old_name: String,
        new_name: String,
    },
    ChangeType {
        table: TableId,
        before: Column,
        after: Column,
    },
    SetAllowBlanks {
        table: TableId,
        column: ColumnId,
        allows: bool,
    },
    SetDefaultValue {
        table: TableId,
        column: ColumnId,
        old_value: CellValue,
        new_value: CellValue,
    },
    AddRow {
        table: TableId,
        index: usize,
        id: RowId,
        values: Vec<CellValue>,
    },
    RemoveRow {
        table: TableId,
        index: usize,
        id: RowId,
        values: Vec<CellValue>,
    },
    UpdateCell {
        table: TableId,
        column: ColumnId,
        row: usize,
        old_value: CellValue,
        new_value: CellValue,
    },
}

impl Command {
    pub fn execute(&self, store: &mut TableStore) {
        let applied = match self {
            Command::AddTable { index, table } => store.insert_table(*index, table.clone()),
            Command::RemoveTable { table, .. } => store.remove_table(table.id()).is_some(),
            Command::RenameTable {
                table, new_name, ..
            } => rename_table(store, *table, new_name),
            Command::AddColumn {
                table,
                index,
                column,
            } => with_table(store, *table, |t| t.insert_column(*index, column.clone())),
            Command::RemoveColumn { table, column, .. } => {
                with_table(store, *table, |t| t.remove_column(column.id()).is_some())
            }
            Command::RenameColumn {
                table,
                column,
                new_name,
                ..
            } => with_column(store, *table, *column, |c| {
                c.set_name(new_name.clone());
            }),
            Command::ChangeType { table, after, .. } => {
                with_table(store, *table, |t| t.replace_column(after.clone()))
            }
            Command::SetAllowBlanks {
                table,
                column,
                allows,
            } => with_column(store, *table, *column, |c| c.set_allows_blanks(*allows)),
            Command::SetDefaultValue {
                table,
                column,
                new_value,
                ..
            } => with_column(store, *table, *column, |c| {
                c.set_default_value(new_value.clone());
            }),
            Command::AddRow {
                table,
                index,
                id,
                values,
            } => with_table(store, *table, |t| t.insert_row(*index, *id, values)),
            Command::RemoveRow {
                table, index, id, ..
            } => remove_row(store, *table, *index, *id),
            Command::UpdateCell {
                table,
                column,
                row,
                new_value,
                ..
            } => update_cell(store, *table, *column, *row, new_value),
        };
        check_applied(applied, self, "execute");
    }

    pub fn undo(&self, store: &mut TableStore) {
        let applied = match self {
            Command::AddTable { table, .. } => store.remove_table(table.id()).is_some(),
            Command::RemoveTable { index, table } => store.insert_table(*index, table.clone()),
            Command::RenameTable {
                table, old_name, ..
            } => rename_table(store, *table, old_name),
            Command::AddColumn { table, column, .. } => {
                with_table(store, *table, |t| t.remove_column(column.id()).is_some())
            }
            Command::RemoveColumn {
                table,
                index,
                column,
            } => with_table(store, *table, |t| t.insert_column(*index, column.clone())),
            Command::RenameColumn {
                table,
                column,
                old_name,
                ..
            } => with_column(store, *table, *column, |c| {
                c.set_name(old_name.clone());
            }),
            Command::ChangeType { table, before, .. } => {
                with_table(store, *table, |t| t.replace_column(before.clone()))
            }
            Command::SetAllowBlanks {
                table,
                column,
                allows,
            } => with_column(store, *table, *column, |c| c.set_allows_blanks(!*allows)),
            Command::SetDefaultValue {
                table,
                column,
                old_value,
                ..
            } => with_column(store, *table, *column, |c| {
                c.set_default_value(old_value.clone());
            }),
            Command::AddRow {
                table, index, id, ..
            } => remove_row(store, *table, *index, *id),
            Command::RemoveRow {
                table,
                index,
                id,
                values,
            } => with_table(store, *table, |t| t.insert_row(*index, *id, values)),
            Command::UpdateCell {
                table,
                column,
                row,
                old_value,
                ..
            } => update_cell(store, *table, *column, *row, old_value),
        };
        check_applied(applied, self, "undo");
    }

    /// Short label for status lines and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Command::AddTable { .. } => "add table",
            Command::RemoveTable { .. } => "remove table",
            Command::RenameTable { .. } => "rename table",
            Command::AddColumn { .. } => "add column",
            Command::RemoveColumn { .. } => "remove column",
            Command::RenameColumn { .. } => "rename column",
            Command::ChangeType { .. } => "change type",
            Command::SetAllowBlanks { .. } => "toggle blanks",
            Command::SetDefaultValue { .. } => "set default",
            Command::AddRow { .. } => "add row",
            Command::RemoveRow { .. } => "remove row",
            Command::UpdateCell { .. } => "edit cell",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::AddTable { table, .. } | Command::RemoveTable { table, .. } => {
                write!(f, "{} '{}'", self.label(), table.name())
            }
            Command::RenameTable {
                old_name, new_name, ..
            }
            | Command::RenameColumn {
                old_name, new_name, ..
            } => write!(f, "{} '{}' -> '{}'", self.label(), old_name, new_name),
            Command::AddColumn { column, .. } | Command::RemoveColumn { column, .. } => {
                write!(f, "{} '{}'", self.label(), column.name())
            }
            Command::ChangeType { before, after, .. } => write!(
                f,
                "{} of '{}' {} -> {}",
                self.label(),
                before.name(),
                before.column_type(),
                after.column_type()
            ),
            Command::SetAllowBlanks { column, allows, .. } => {
                write!(f, "{} of {} to {}", self.label(), column, allows)
            }
            Command::SetDefaultValue {
                column,
                old_value,
                new_value,
                ..
            } => write!(
                f,
                "{} of {} '{}' -> '{}'",
                self.label(),
                column,
                old_value,
                new_value
            ),
            Command::AddRow {
                table, index, id, ..
            }
            | Command::RemoveRow {
                table, index, id, ..
            } => write!(f, "{} {} ({}) of {}", self.label(), index, id, table),
            Command::UpdateCell {
                column,
                row,
                old_value,
                new_value,
                ..
            } => write!(
                f,
                "{} {}[{}] '{}' -> '{}'",
                self.label(),
                column,
                row,
                old_value,
                new_value
            ),
        }
    }
}

fn with_table(store: &mut TableStore, id: TableId, f: impl FnOnce(&mut Table) -> bool) -> bool {
    store.table_mut(id).map(f).unwrap_or(false)
}

fn with_column(
    store: &mut TableStore,
    table: TableId,
    column: ColumnId,
    f: impl FnOnce(&mut Column),
) -> bool {
    match store.table_mut(table).and_then(|t| t.column_mut(column)) {
        Some(c) => {
            f(c);
            true
        }
        None => false,
    }
}

fn rename_table(store: &mut TableStore, id: TableId, name: &str) -> bool {
    with_table(store, id, |t| {
        t.set_name(name.to_string());
        true
    })
}

/// Only removes the row when `id` still sits at `index`.
fn remove_row(store: &mut TableStore, table: TableId, index: usize, id: RowId) -> bool {
    with_table(store, table, |t| {
        t.row_id(index) == Some(id) && t.remove_row(index).is_some()
    })
}

fn update_cell(
    store: &mut TableStore,
    table: TableId,
    column: ColumnId,
    row: usize,
    value: &CellValue,
) -> bool {
    store
        .table_mut(table)
        .and_then(|t| t.column_mut(column))
        .and_then(|c| c.set_cell(row, value.clone()))
        .is_some()
}

/// Commands are validated before they are built, so a failure here means
/// history and store have drifted apart.
fn check_applied(applied: bool, command: &Command, phase: &str) {
    if !applied {
        error!(target: "history", "{} could not {}: {}", command.label(), phase, command);
        debug_assert!(applied, "command could not {}: {}", phase, command);
    }
}
