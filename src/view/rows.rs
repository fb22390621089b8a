use std::collections::BTreeSet;

use tracing::debug;

use super::layout::{self, DEFAULT_CELL_WIDTH};
use super::{
    DesignView, EditTarget, EditView, KeyInput, TablesView, View, ViewContext, ViewRequest,
};
use crate::manager::TableManager;
use crate::model::{CellValue, ColumnType, RowId, TableId};
use crate::window::surface::Surface;

const HEADER_LINE: i32 = 0;
const FIRST_ROW: i32 = 1;

/// Row grid of one table. The selection holds row ids, so it stays on the
/// same rows when another frame removes rows above them.
#[derive(Debug, Clone)]
pub struct RowsView {
    table: TableId,
    selected: BTreeSet<RowId>,
    widths: Vec<u16>,
}

impl RowsView {
    pub fn new(table: TableId) -> Self {
        Self {
            table,
            selected: BTreeSet::new(),
            widths: Vec::new(),
        }
    }

    pub fn table(&self) -> TableId {
        self.table
    }

    pub fn selected(&self) -> &BTreeSet<RowId> {
        &self.selected
    }

    /// Width per column; columns never resized use the default width.
    pub fn widths(&self, columns: usize) -> Vec<u16> {
        (0..columns)
            .map(|i| self.widths.get(i).copied().unwrap_or(DEFAULT_CELL_WIDTH))
            .collect()
    }

    pub fn title(&self, tables: &TableManager) -> String {
        match tables.table(self.table) {
            Some(t) => format!("Rows: {}", t.name()),
            None => "Rows".to_string(),
        }
    }

    fn row_at(&self, y: i32, tables: &TableManager) -> Option<usize> {
        let row = usize::try_from(y - FIRST_ROW).ok()?;
        let rows = tables.table(self.table)?.row_count();
        (row < rows).then_some(row)
    }

    pub fn paint(
        &self,
        surface: &mut dyn Surface,
        tables: &TableManager,
        editing: Option<&EditTarget>,
    ) {
        let Some(table) = tables.table(self.table) else {
            return;
        };
        let widths = self.widths(table.columns().len());
        let headers: Vec<String> = table
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        let header_style = layout::header_style();
        layout::paint_fields(surface, HEADER_LINE, &widths, &headers, header_style, None);

        for (row, id) in table.row_ids().iter().enumerate() {
            let y = FIRST_ROW + row as i32;
            let selected = self.selected.contains(id);
            layout::paint_marker(surface, y, selected);

            let field = match editing {
                Some(EditTarget::Cell { column, row: r, .. }) if r == id => {
                    table.column_index(*column)
                }
                _ => None,
            };
            let texts: Vec<String> = table
                .columns()
                .iter()
                .map(|c| c.cells()[row].to_string())
                .collect();
            let style = if selected {
                layout::selected_style()
            } else {
                Default::default()
            };
            layout::paint_fields(surface, y, &widths, &texts, style, field);
        }
    }

    pub fn handle_single_click(
        &mut self,
        x: i32,
        y: i32,
        ctx: &mut ViewContext<'_>,
    ) -> ViewRequest {
        let Some(row) = self.row_at(y, ctx.tables) else {
            return ViewRequest::None;
        };
        let Some(id) = ctx.tables.row_id(self.table, row) else {
            return ViewRequest::None;
        };
        if layout::in_margin(x) {
            if !self.selected.remove(&id) {
                self.selected.insert(id);
            }
            return ViewRequest::None;
        }

        let Some(table) = ctx.tables.table(self.table) else {
            return ViewRequest::None;
        };
        let widths = self.widths(table.columns().len());
        let Some(column) = layout::field_at(&widths, x).map(|i| &table.columns()[i]) else {
            return ViewRequest::None;
        };
        let column_id = column.id();

        if column.column_type() == ColumnType::Boolean {
            let next = match column.cell(row) {
                Some(CellValue::Boolean(value)) => !value,
                _ => true,
            };
            let text = next.to_string();
            if let Err(e) = ctx.tables.update_cell(self.table, column_id, row, &text) {
                debug!(target: "views", "cell toggle refused: {}", e);
            }
            return ViewRequest::None;
        }

        let target = EditTarget::Cell {
            table: self.table,
            column: column_id,
            row: id,
        };
        match EditView::new(target, ctx.view_id, ctx.tables) {
            Some(edit) => ViewRequest::Substitute(View::Edit(edit)),
            None => ViewRequest::None,
        }
    }

    pub fn handle_double_click(&mut self, y: i32, ctx: &mut ViewContext<'_>) -> ViewRequest {
        let Some(table) = ctx.tables.table(self.table) else {
            return ViewRequest::None;
        };
        if y >= FIRST_ROW + table.row_count() as i32 {
            match ctx.tables.add_row(self.table) {
                Ok(row) => debug!(target: "views", "added row {}", row),
                Err(e) => debug!(target: "views", "add row refused: {}", e),
            }
        }
        ViewRequest::None
    }

    pub fn handle_mouse_drag(
        &mut self,
        start: (i32, i32),
        end: (i32, i32),
        tables: &TableManager,
    ) -> ViewRequest {
        let columns = tables.table(self.table).map_or(0, |t| t.columns().len());
        let mut widths = self.widths(columns);
        if let Some(column) = layout::field_at(&widths, start.0) {
            layout::resize_field(&mut widths, column, end.0 - start.0);
            self.widths = widths;
        }
        ViewRequest::None
    }

    pub fn handle_key(&mut self, key: KeyInput, ctx: &mut ViewContext<'_>) -> ViewRequest {
        match key {
            KeyInput::Escape => ViewRequest::Substitute(View::Tables(TablesView::new())),
            KeyInput::CtrlEnter => {
                ViewRequest::Substitute(View::Design(DesignView::new(self.table)))
            }
            KeyInput::Delete => {
                // Positions are looked up one removal at a time.
                for id in std::mem::take(&mut self.selected) {
                    let Some(row) = ctx.tables.row_index(self.table, id) else {
                        debug!(target: "views", "selected row {} is already gone", id);
                        continue;
                    };
                    if let Err(e) = ctx.tables.remove_row(self.table, row) {
                        debug!(target: "views", "skipping removal of row {}: {}", row, e);
                    }
                }
                ViewRequest::None
            }
            _ => ViewRequest::None,
        }
    }
}
