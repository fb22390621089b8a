use super::table::{ColumnId, RowId, Table, TableId};

/// Owns every table. Mutators are crate-private: outside code changes data
/// through [`crate::manager::TableManager`], which routes each change
/// through the command history.
#[derive(Debug, Clone, Default)]
pub struct TableStore {
    tables: Vec<Table>,
    next_table_id: u64,
    next_column_id: u64,
    next_row_id: u64,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.iter().find(|t| t.id() == id)
    }

    pub fn table_index(&self, id: TableId) -> Option<usize> {
        self.tables.iter().position(|t| t.id() == id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Smallest `Table<n>` not currently in use.
    pub fn unique_table_name(&self) -> String {
        (0..)
            .map(|n| format!("Table{}", n))
            .find(|name| self.tables.iter().all(|t| t.name() != name))
            .unwrap_or_default()
    }

    pub(crate) fn allocate_table_id(&mut self) -> TableId {
        let id = TableId(self.next_table_id);
        self.next_table_id += 1;
        id
    }

    pub(crate) fn allocate_column_id(&mut self) -> ColumnId {
        let id = ColumnId(self.next_column_id);
        self.next_column_id += 1;
        id
    }

    pub(crate) fn allocate_row_id(&mut self) -> RowId {
        let id = RowId(self.next_row_id);
        self.next_row_id += 1;
        id
    }

    pub(crate) fn table_mut(&mut self, id: TableId) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.id() == id)
    }

    pub(crate) fn insert_table(&mut self, index: usize, table: Table) -> bool {
        if index > self.tables.len() || self.table(table.id()).is_some() {
            return false;
        }
        self.tables.insert(index, table);
        true
    }

    pub(crate) fn remove_table(&mut self, id: TableId) -> Option<Table> {
        let index = self.table_index(id)?;
        Some(self.tables.remove(index))
    }
}
