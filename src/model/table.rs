use std::fmt;

use super::value::{CellValue, ColumnType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId(pub(crate) u64);

/// Identity of a row, stable while other rows come and go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub(crate) u64);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A column and the cells it holds, one per table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    id: ColumnId,
    name: String,
    column_type: ColumnType,
    allows_blanks: bool,
    default_value: CellValue,
    cells: Vec<CellValue>,
}

impl Column {
    /// A fresh String column that allows blanks and defaults to "x".
    pub(crate) fn new(id: ColumnId, name: String, rows: usize) -> Self {
        let default_value = CellValue::Text("x".to_string());
        Self {
            id,
            name,
            column_type: ColumnType::String,
            allows_blanks: true,
            cells: vec![default_value.clone(); rows],
            default_value,
        }
    }

    pub fn id(&self) -> ColumnId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn allows_blanks(&self) -> bool {
        self.allows_blanks
    }

    pub fn default_value(&self) -> &CellValue {
        &self.default_value
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn cell(&self, row: usize) -> Option<&CellValue> {
        self.cells.get(row)
    }

    pub fn has_blanks(&self) -> bool {
        self.default_value.is_blank() || self.cells.iter().any(CellValue::is_blank)
    }

    /// Copy of this column switched to `ty`. Cells whose text does not parse
    /// under the new type take the new type's fallback value.
    pub(crate) fn converted_to(&self, ty: ColumnType) -> Column {
        let fallback = ty.fallback_value(self.allows_blanks);
        let convert = |value: &CellValue| {
            value
                .convert(ty, self.allows_blanks)
                .unwrap_or_else(|| fallback.clone())
        };
        Column {
            id: self.id,
            name: self.name.clone(),
            column_type: ty,
            allows_blanks: self.allows_blanks,
            default_value: fallback.clone(),
            cells: self.cells.iter().map(convert).collect(),
        }
    }

    pub(crate) fn set_name(&mut self, name: String) -> String {
        std::mem::replace(&mut self.name, name)
    }

    pub(crate) fn set_allows_blanks(&mut self, allows: bool) {
        self.allows_blanks = allows;
    }

    pub(crate) fn set_default_value(&mut self, value: CellValue) -> CellValue {
        std::mem::replace(&mut self.default_value, value)
    }

    pub(crate) fn set_cell(&mut self, row: usize, value: CellValue) -> Option<CellValue> {
        self.cells
            .get_mut(row)
            .map(|cell| std::mem::replace(cell, value))
    }
}

/// A named table. Every column holds exactly one cell per entry of
/// `rows`, which gives each position its stable id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    id: TableId,
    name: String,
    columns: Vec<Column>,
    rows: Vec<RowId>,
}

impl Table {
    pub(crate) fn new(id: TableId, name: String) -> Self {
        Self {
            id,
            name,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_index(&self, id: ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_ids(&self) -> &[RowId] {
        &self.rows
    }

    pub fn row_id(&self, index: usize) -> Option<RowId> {
        self.rows.get(index).copied()
    }

    /// Current position of a row.
    pub fn row_index(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|r| *r == id)
    }

    /// Values of every column for one row, in column order.
    pub fn row(&self, row: usize) -> Option<Vec<CellValue>> {
        if row >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| c.cells[row].clone()).collect())
    }

    /// Smallest `Column<n>` not used by this table.
    pub fn unique_column_name(&self) -> String {
        (0..)
            .map(|n| format!("Column{}", n))
            .find(|name| self.columns.iter().all(|c| c.name != *name))
            .unwrap_or_default()
    }

    /// Row of column defaults, in column order.
    pub fn default_row(&self) -> Vec<CellValue> {
        self.columns
            .iter()
            .map(|c| c.default_value.clone())
            .collect()
    }

    pub(crate) fn column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == id)
    }

    pub(crate) fn set_name(&mut self, name: String) -> String {
        std::mem::replace(&mut self.name, name)
    }

    pub(crate) fn insert_column(&mut self, index: usize, column: Column) -> bool {
        if index > self.columns.len() || column.cells.len() != self.row_count() {
            return false;
        }
        self.columns.insert(index, column);
        true
    }

    pub(crate) fn remove_column(&mut self, id: ColumnId) -> Option<Column> {
        let index = self.column_index(id)?;
        Some(self.columns.remove(index))
    }

    /// Swap a column for another with the same id, keeping its position.
    pub(crate) fn replace_column(&mut self, column: Column) -> bool {
        match self.column_mut(column.id) {
            Some(slot) if column.cells.len() == slot.cells.len() => {
                *slot = column;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn insert_row(&mut self, index: usize, id: RowId, values: &[CellValue]) -> bool {
        if index > self.row_count()
            || values.len() != self.columns.len()
            || self.row_index(id).is_some()
        {
            return false;
        }
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.cells.insert(index, value.clone());
        }
        self.rows.insert(index, id);
        true
    }

    pub(crate) fn remove_row(&mut self, index: usize) -> Option<(RowId, Vec<CellValue>)> {
        if index >= self.row_count() {
            return None;
        }
        let id = self.rows.remove(index);
        let values = self
            .columns
            .iter_mut()
            .map(|c| c.cells.remove(index))
            .collect();
        Some((id, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_rows(rows: usize) -> Table {
        let mut table = Table::new(TableId(0), "Table0".to_string());
        for id in 0..rows {
            assert!(table.insert_row(table.row_count(), RowId(id as u64), &[]));
        }
        table
    }

    #[test]
    fn test_new_column_fills_existing_rows() {
        let mut table = table_with_rows(3);
        let column = Column::new(ColumnId(1), table.unique_column_name(), table.row_count());
        assert!(table.insert_column(0, column));

        let column = &table.columns()[0];
        assert_eq!(column.name(), "Column0");
        assert_eq!(column.cells().len(), 3);
        assert!(column.cells().iter().all(|c| c.to_string() == "x"));
    }

    #[test]
    fn test_insert_column_rejects_wrong_height() {
        let mut table = table_with_rows(2);
        let column = Column::new(ColumnId(1), "Column0".to_string(), 5);
        assert!(!table.insert_column(0, column));
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_unique_column_name_reuses_gaps() {
        let mut table = table_with_rows(0);
        for id in 0..3 {
            let name = table.unique_column_name();
            assert!(table.insert_column(id as usize, Column::new(ColumnId(id), name, 0)));
        }
        table.remove_column(ColumnId(1));
        assert_eq!(table.unique_column_name(), "Column1");
    }

    #[test]
    fn test_remove_row_returns_values() {
        let mut table = table_with_rows(0);
        table.insert_column(0, Column::new(ColumnId(0), "a".to_string(), 0));
        table.insert_row(0, RowId(10), &[CellValue::Text("first".to_string())]);
        table.insert_row(1, RowId(11), &[CellValue::Text("second".to_string())]);

        let removed = table.remove_row(0).unwrap();
        assert_eq!(removed, (RowId(10), vec![CellValue::Text("first".to_string())]));
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.remove_row(4), None);
    }

    #[test]
    fn test_row_ids_follow_their_rows() {
        let mut table = table_with_rows(3);
        assert_eq!(table.row_index(RowId(2)), Some(2));

        table.remove_row(0);
        assert_eq!(table.row_index(RowId(2)), Some(1));
        assert_eq!(table.row_index(RowId(0)), None);
        assert_eq!(table.row_id(0), Some(RowId(1)));

        // An id already present cannot be inserted twice.
        assert!(!table.insert_row(0, RowId(1), &[]));
        assert!(table.insert_row(0, RowId(0), &[]));
        assert_eq!(table.row_ids(), &[RowId(0), RowId(1), RowId(2)]);
    }

    #[test]
    fn test_converted_column_uses_fallback() {
        let mut column = Column::new(ColumnId(0), "n".to_string(), 2);
        column.set_cell(1, CellValue::Text("7".to_string()));

        let converted = column.converted_to(ColumnType::Integer);
        assert_eq!(converted.column_type(), ColumnType::Integer);
        assert_eq!(converted.cells()[0], CellValue::Integer(0));
        assert_eq!(converted.cells()[1], CellValue::Integer(7));
        assert_eq!(converted.default_value(), &CellValue::Integer(0));
    }
}
